//! Export support for document-store collections

use std::path::Path;

use crate::csv::write_csv_rows;
use crate::error::Result;
use crate::flatten::flatten;
use crate::record::NestedRecord;
use crate::table::Header;

/// A queryable source of nested records, such as a document-store collection
///
/// This is the only capability the export path needs: run a query, get back
/// the matching records.
pub trait DocumentSource {
    /// Return every record matching `query`
    fn find(&self, query: &NestedRecord) -> Vec<NestedRecord>;
}

/// Flatten every record matching `query` and write them as rows to `path`
///
/// The header is computed per [`crate::table::rows_to_tuples`] rules when not
/// supplied.
pub fn write_collection<S, P>(
    source: &S,
    query: &NestedRecord,
    path: P,
    headers: Option<Header>,
) -> Result<()>
where
    S: DocumentSource,
    P: AsRef<Path>,
{
    let mut rows = Vec::new();
    for record in source.find(query) {
        rows.push(flatten(&record)?);
    }
    write_csv_rows(path, &rows, headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Node;
    use std::fs;
    use tempfile::TempDir;

    struct MemorySource {
        records: Vec<NestedRecord>,
    }

    impl DocumentSource for MemorySource {
        fn find(&self, _query: &NestedRecord) -> Vec<NestedRecord> {
            self.records.clone()
        }
    }

    #[test]
    fn test_write_collection_flattens_records() {
        let mut inner = NestedRecord::new();
        inner.insert("b".to_string(), Node::from(1.0));
        let mut record = NestedRecord::new();
        record.insert("a".to_string(), Node::Map(inner));

        let source = MemorySource {
            records: vec![record],
        };

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.tsv");
        write_collection(&source, &NestedRecord::new(), &path, None).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "a.b\n1\n");
    }
}
