//! Flatten/unflatten transform between nested records and dotted-path flat records

use crate::error::{Result, TableError};
use crate::record::{FlatRecord, NestedRecord, Node, Scalar};

/// Flatten a nested record into a single-level record with dotted-path keys
///
/// A leaf at path `[a, b, c]` produces the entry `"a.b.c"`. Entries follow the
/// record's insertion order.
///
/// # Errors
/// - `TableError::PathConflict` if two leaves join to the same dotted path,
///   which can happen when a field name itself contains a `.`
pub fn flatten(record: &NestedRecord) -> Result<FlatRecord> {
    let mut flat = FlatRecord::new();
    let mut path = Vec::new();
    flatten_into(record, &mut path, &mut flat)?;
    Ok(flat)
}

fn flatten_into<'a>(
    record: &'a NestedRecord,
    path: &mut Vec<&'a str>,
    flat: &mut FlatRecord,
) -> Result<()> {
    for (key, node) in record {
        path.push(key);
        match node {
            Node::Map(nested) => flatten_into(nested, path, flat)?,
            Node::Leaf(value) => {
                let joined = path.join(".");
                if flat.insert(joined.clone(), value.clone()).is_some() {
                    return Err(TableError::PathConflict(joined));
                }
            }
        }
        path.pop();
    }
    Ok(())
}

/// Rebuild a nested record from a flat record with dotted-path keys
///
/// Each key is split on `.`; intermediate mappings are created on demand and
/// reused when already present, and the leaf is set at the final token.
///
/// # Errors
/// - `TableError::PathConflict` if a walk would descend through an existing
///   leaf (e.g. setting `"a.b"` after `"a"` was set to a scalar), or if the
///   final token already holds a nested mapping
pub fn unflatten(flat: &FlatRecord) -> Result<NestedRecord> {
    let mut root = NestedRecord::new();
    for (path, value) in flat {
        set_deep(&mut root, path, value)?;
    }
    Ok(root)
}

fn set_deep(root: &mut NestedRecord, path: &str, value: &Scalar) -> Result<()> {
    let tokens: Vec<&str> = path.split('.').collect();
    let mut current = root;
    for token in &tokens[..tokens.len() - 1] {
        let node = current
            .entry((*token).to_string())
            .or_insert_with(|| Node::Map(NestedRecord::new()));
        current = match node {
            Node::Map(map) => map,
            Node::Leaf(_) => return Err(TableError::PathConflict(path.to_string())),
        };
    }
    let last = tokens[tokens.len() - 1];
    if let Some(Node::Map(_)) = current.get(last) {
        return Err(TableError::PathConflict(path.to_string()));
    }
    current.insert(last.to_string(), Node::Leaf(value.clone()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Scalar;

    fn nested() -> NestedRecord {
        let mut inner = NestedRecord::new();
        inner.insert("b".to_string(), Node::from(1.0));
        inner.insert("c".to_string(), Node::from("hello"));
        let mut root = NestedRecord::new();
        root.insert("a".to_string(), Node::Map(inner));
        root.insert("d".to_string(), Node::from(2.5));
        root
    }

    #[test]
    fn test_flatten() {
        let flat = flatten(&nested()).unwrap();
        assert_eq!(flat.get("a.b"), Some(&Scalar::Number(1.0)));
        assert_eq!(flat.get("a.c"), Some(&Scalar::Text("hello".to_string())));
        assert_eq!(flat.get("d"), Some(&Scalar::Number(2.5)));
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn test_unflatten_flatten_round_trip() {
        let record = nested();
        let rebuilt = unflatten(&flatten(&record).unwrap()).unwrap();
        assert_eq!(rebuilt, record);
    }

    #[test]
    fn test_flatten_unflatten_round_trip() {
        let mut flat = FlatRecord::new();
        flat.insert("a.b.c".to_string(), Scalar::Number(1.0));
        flat.insert("a.b.d".to_string(), Scalar::Text("x".to_string()));
        flat.insert("e".to_string(), Scalar::Number(2.0));
        let flattened = flatten(&unflatten(&flat).unwrap()).unwrap();
        assert_eq!(flattened, flat);
    }

    #[test]
    fn test_flatten_conflict_on_dotted_field_name() {
        let mut inner = NestedRecord::new();
        inner.insert("b".to_string(), Node::from(1.0));
        let mut root = NestedRecord::new();
        root.insert("a".to_string(), Node::Map(inner));
        // joins to "a.b" as well
        root.insert("a.b".to_string(), Node::from(2.0));
        assert!(matches!(flatten(&root), Err(TableError::PathConflict(_))));
    }

    #[test]
    fn test_unflatten_conflict_descending_through_leaf() {
        let mut flat = FlatRecord::new();
        flat.insert("a".to_string(), Scalar::Number(1.0));
        flat.insert("a.b".to_string(), Scalar::Number(2.0));
        assert!(matches!(unflatten(&flat), Err(TableError::PathConflict(_))));
    }

    #[test]
    fn test_unflatten_conflict_leaf_over_map() {
        let mut flat = FlatRecord::new();
        flat.insert("a.b".to_string(), Scalar::Number(1.0));
        flat.insert("a".to_string(), Scalar::Number(2.0));
        assert!(matches!(unflatten(&flat), Err(TableError::PathConflict(_))));
    }

    #[test]
    fn test_unflatten_reuses_intermediate_maps() {
        let mut flat = FlatRecord::new();
        flat.insert("a.b".to_string(), Scalar::Number(1.0));
        flat.insert("a.c".to_string(), Scalar::Number(2.0));
        let record = unflatten(&flat).unwrap();
        let inner = record.get("a").unwrap().as_map().unwrap();
        assert_eq!(inner.len(), 2);
    }
}
