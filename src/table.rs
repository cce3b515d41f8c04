//! Conversion of heterogeneous row mappings into a canonical header and row tuples

use std::collections::BTreeSet;

use crate::record::{FlatRecord, Scalar};

/// Ordered list of unique field names defining column positions in a file
pub type Header = Vec<String>;

/// A row of cells aligned positionally to a header
///
/// `None` is the explicit "no value" sentinel for fields absent from a row,
/// distinct from an empty string or zero.
pub type RowTuple = Vec<Option<Scalar>>;

/// Project row mappings onto a canonical header, producing positional tuples
///
/// When `headers` is not supplied it is computed as the sorted union of all
/// keys across all rows. Fields absent from a row map to `None` in its tuple.
///
/// Header inference requires seeing every row before any can be projected,
/// hence the fully materialized slice: the input is walked twice.
pub fn rows_to_tuples(rows: &[FlatRecord], headers: Option<Header>) -> (Header, Vec<RowTuple>) {
    let headers = headers.unwrap_or_else(|| {
        let mut fields = BTreeSet::new();
        for row in rows {
            for key in row.keys() {
                fields.insert(key.clone());
            }
        }
        fields.into_iter().collect()
    });

    let tuples = rows
        .iter()
        .map(|row| headers.iter().map(|field| row.get(field).cloned()).collect())
        .collect();

    (headers, tuples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, f64)]) -> FlatRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Scalar::Number(*v)))
            .collect()
    }

    #[test]
    fn test_inferred_headers_are_sorted_union() {
        let rows = vec![row(&[("a", 1.0)]), row(&[("b", 2.0)])];
        let (headers, tuples) = rows_to_tuples(&rows, None);
        assert_eq!(headers, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            tuples,
            vec![
                vec![Some(Scalar::Number(1.0)), None],
                vec![None, Some(Scalar::Number(2.0))],
            ]
        );
    }

    #[test]
    fn test_supplied_headers_are_authoritative() {
        let rows = vec![row(&[("a", 1.0), ("b", 2.0)])];
        let (headers, tuples) =
            rows_to_tuples(&rows, Some(vec!["b".to_string(), "a".to_string()]));
        assert_eq!(headers, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(
            tuples,
            vec![vec![Some(Scalar::Number(2.0)), Some(Scalar::Number(1.0))]]
        );
    }

    #[test]
    fn test_empty_rows() {
        let (headers, tuples) = rows_to_tuples(&[], None);
        assert!(headers.is_empty());
        assert!(tuples.is_empty());
    }
}
