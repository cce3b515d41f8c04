use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Result, TableError};
use crate::record::{FlatRecord, NONE_CELL, Scalar};
use crate::table::{Header, RowTuple, rows_to_tuples};

/// Options for loading rows from a delimited file
///
/// The default reads tab-separated text, takes the first row as the header and
/// performs no filtering.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Header to use instead of the file's first row
    pub header: Option<Header>,
    /// Silently skip rows whose width differs from the header, and rows
    /// containing the literal `None` sentinel in any cell
    pub filter_incomplete: bool,
    /// Drop the first data row and every second row after it, keeping rows at
    /// odd 0-indexed positions (decimation for paired-sample data)
    pub drop_alternate: bool,
    /// Field separator
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            header: None,
            filter_incomplete: false,
            drop_alternate: false,
            delimiter: b'\t',
        }
    }
}

/// Load a delimited file as a sequence of flat row mappings
///
/// The first row is treated as the header unless `options.header` is supplied.
/// Each cell is decoded via [`Scalar::decode`] and zipped positionally with the
/// header. An empty file yields an empty sequence.
///
/// # Errors
/// - `TableError::RowWidthMismatch` when `filter_incomplete` is false and a
///   row's cell count differs from the header's length
pub fn load_csv_rows<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Vec<FlatRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let mut records = csv_reader.records();
    let header: Header = match &options.header {
        Some(header) => header.clone(),
        None => match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Ok(Vec::new()),
        },
    };

    let mut rows = Vec::new();
    let mut odd = false;
    for result in records {
        let record = result?;
        odd = !odd;
        if options.drop_alternate && odd {
            continue;
        }
        if options.filter_incomplete {
            if record.len() != header.len() {
                continue;
            }
            if record.iter().any(|cell| cell == NONE_CELL) {
                continue;
            }
        } else if record.len() != header.len() {
            return Err(TableError::RowWidthMismatch {
                expected: header.len(),
                got: record.len(),
            });
        }

        let mut row = FlatRecord::with_capacity(header.len());
        for (field, cell) in header.iter().zip(record.iter()) {
            row.insert(field.clone(), Scalar::decode(cell));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Load a delimited file column-wise, as field name → column vector
///
/// Unlike [`load_csv_rows`] the width check is always fatal, and rows carrying
/// the `None` sentinel are always skipped.
pub fn load_csv_columns<P: AsRef<Path>>(
    path: P,
    header: Option<&[String]>,
    delimiter: u8,
) -> Result<IndexMap<String, Vec<Scalar>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut records = csv_reader.records();
    let header: Header = match header {
        Some(header) => header.to_vec(),
        None => match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Ok(IndexMap::new()),
        },
    };

    let mut columns: IndexMap<String, Vec<Scalar>> = header
        .iter()
        .map(|field| (field.clone(), Vec::new()))
        .collect();

    for result in records {
        let record = result?;
        if record.len() != header.len() {
            return Err(TableError::RowWidthMismatch {
                expected: header.len(),
                got: record.len(),
            });
        }
        if record.iter().any(|cell| cell == NONE_CELL) {
            continue;
        }
        for (field, cell) in header.iter().zip(record.iter()) {
            if let Some(column) = columns.get_mut(field) {
                column.push(Scalar::decode(cell));
            }
        }
    }

    Ok(columns)
}

/// Apply a post-processing step to every column of a columnar load
///
/// Keeps array conversion (e.g. into a numeric-array type) out of the core
/// loader as an injectable step the caller controls.
pub fn map_columns<T, F>(columns: IndexMap<String, Vec<Scalar>>, mut f: F) -> IndexMap<String, T>
where
    F: FnMut(Vec<Scalar>) -> T,
{
    columns.into_iter().map(|(k, v)| (k, f(v))).collect()
}

/// Write a header row followed by row tuples to a tab-separated file
///
/// Missing cells (the `None` sentinel) are written as the literal text `None`.
/// The file at `path` is created or truncated.
pub fn write_csv_headers_rows<P: AsRef<Path>>(
    path: P,
    headers: &[String],
    rows: &[RowTuple],
) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut csv_writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);

    csv_writer.write_record(headers)?;
    for row in rows {
        write_tuple(&mut csv_writer, row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write flat row mappings to a tab-separated file
///
/// The header is computed per [`rows_to_tuples`] rules when not supplied.
pub fn write_csv_rows<P: AsRef<Path>>(
    path: P,
    rows: &[FlatRecord],
    headers: Option<Header>,
) -> Result<()> {
    let (headers, tuples) = rows_to_tuples(rows, headers);
    write_csv_headers_rows(path, &headers, &tuples)
}

/// Write column vectors to a tab-separated file
///
/// Columns are zipped row-wise; uneven columns are truncated to the shortest.
pub fn write_csv_columns<P: AsRef<Path>>(
    path: P,
    columns: &IndexMap<String, Vec<Scalar>>,
) -> Result<()> {
    let headers: Header = columns.keys().cloned().collect();
    let len = columns.values().map(Vec::len).min().unwrap_or(0);
    let mut tuples = Vec::with_capacity(len);
    for i in 0..len {
        tuples.push(
            columns
                .values()
                .map(|column| column.get(i).cloned())
                .collect(),
        );
    }
    write_csv_headers_rows(path, &headers, &tuples)
}

/// Write either columns or rows to a tab-separated file
///
/// # Errors
/// - `TableError::ColumnsOrRows` unless exactly one of the two is supplied
pub fn write_csv<P: AsRef<Path>>(
    path: P,
    columns: Option<&IndexMap<String, Vec<Scalar>>>,
    rows: Option<&[FlatRecord]>,
) -> Result<()> {
    match (columns, rows) {
        (Some(columns), None) => write_csv_columns(path, columns),
        (None, Some(rows)) => write_csv_rows(path, rows, None),
        _ => Err(TableError::ColumnsOrRows),
    }
}

/// Append flat row mappings to a delimited file, reconciling headers
///
/// - If the file does not exist, a fresh file is written with header and rows.
/// - If every new field already appears in the existing header, the existing
///   ordering is authoritative: new rows are projected onto it and appended in
///   place, leaving existing lines untouched.
/// - Otherwise the header grows to the union (existing order first, new fields
///   appended in sorted order), which requires loading all existing rows and
///   rewriting the entire file, since columns cannot be inserted mid-file.
///
/// The append-in-place path is not atomic: an interruption can leave some but
/// not all new rows written. Callers requiring atomicity should write to a
/// temporary path and rename.
pub fn append_csv_rows<P: AsRef<Path>>(
    path: P,
    rows: &[FlatRecord],
    headers: Option<Header>,
) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "no existing file, writing fresh table");
        return write_csv_rows(path, rows, headers);
    }

    let old_headers = read_header(path)?;
    let new_fields: std::collections::BTreeSet<String> = match &headers {
        Some(headers) => headers.iter().cloned().collect(),
        None => rows.iter().flat_map(|row| row.keys().cloned()).collect(),
    };

    if new_fields.iter().all(|field| old_headers.contains(field)) {
        debug!(
            path = %path.display(),
            rows = rows.len(),
            "new fields fit the existing header, appending in place"
        );
        let (_, tuples) = rows_to_tuples(rows, Some(old_headers));
        let file = OpenOptions::new().append(true).open(path)?;
        let writer = BufWriter::new(file);
        let mut csv_writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        for row in &tuples {
            write_tuple(&mut csv_writer, row)?;
        }
        csv_writer.flush()?;
        return Ok(());
    }

    debug!(
        path = %path.display(),
        rows = rows.len(),
        "new fields grow the header, rewriting the whole file"
    );
    let mut merged = old_headers.clone();
    merged.extend(
        new_fields
            .into_iter()
            .filter(|field| !old_headers.contains(field)),
    );

    let mut all_rows = load_csv_rows(path, &LoadOptions::default())?;
    all_rows.extend_from_slice(rows);
    let (merged, tuples) = rows_to_tuples(&all_rows, Some(merged));
    write_csv_headers_rows(path, &merged, &tuples)
}

fn read_header(path: &Path) -> Result<Header> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b'\t')
        .from_reader(reader);
    match csv_reader.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Err(TableError::MissingHeader(path.display().to_string())),
    }
}

fn write_tuple<W: Write>(writer: &mut csv::Writer<W>, row: &RowTuple) -> Result<()> {
    let cells: Vec<String> = row
        .iter()
        .map(|cell| match cell {
            Some(value) => value.to_string(),
            None => NONE_CELL.to_string(),
        })
        .collect();
    writer.write_record(&cells)?;
    Ok(())
}
