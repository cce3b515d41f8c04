use std::fmt;

use indexmap::IndexMap;

/// Literal cell text that marks a missing or invalid value in a delimited file.
///
/// Missing cells are written out as this text, which is why row-level filtering
/// treats it as the "no value" marker on the way back in.
pub const NONE_CELL: &str = "None";

/// A leaf value in a record: either a number or plain text
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Floating point value
    Number(f64),
    /// Text value
    Text(String),
}

impl Scalar {
    /// Decode a textual cell into a scalar
    ///
    /// Attempts to parse the cell as a floating point number and keeps the
    /// original text when parsing fails. The coercion is one-way: `"1.0"` and
    /// `"1"` both decode to the number `1`, so the original text form is not
    /// guaranteed to round-trip.
    ///
    /// The sentinel text `"None"` is not treated specially here; it decodes to
    /// `Text("None")` and is only recognized by row-level filtering.
    pub fn decode(cell: &str) -> Self {
        match cell.parse::<f64>() {
            Ok(v) => Scalar::Number(v),
            Err(_) => Scalar::Text(cell.to_string()),
        }
    }

    /// Get as number, if this is a Number value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string reference, if this is a Text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Number(_) => "Number",
            Scalar::Text(_) => "Text",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(v) => write!(f, "{}", v),
            Scalar::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Number(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

/// A nested mapping from field names to values
pub type NestedRecord = IndexMap<String, Node>;

/// A single-level mapping from dotted-path field names to scalars
pub type FlatRecord = IndexMap<String, Scalar>;

/// A value inside a nested record: a scalar leaf or another mapping
///
/// This is a closed sum, so flatten/unflatten decide "nested vs leaf" by
/// matching on the variant rather than probing values for mapping capability.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A terminal scalar value
    Leaf(Scalar),
    /// A nested mapping
    Map(NestedRecord),
}

impl Node {
    /// Get the scalar, if this is a leaf
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// Get the nested mapping, if this is a map
    pub fn as_map(&self) -> Option<&NestedRecord> {
        match self {
            Node::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Scalar> for Node {
    fn from(v: Scalar) -> Self {
        Node::Leaf(v)
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Node::Leaf(Scalar::Number(v))
    }
}

impl From<&str> for Node {
    fn from(v: &str) -> Self {
        Node::Leaf(Scalar::Text(v.to_string()))
    }
}

impl From<NestedRecord> for Node {
    fn from(v: NestedRecord) -> Self {
        Node::Map(v)
    }
}

/// Convert a JSON value into a node
///
/// Objects become maps and strings/numbers become leaves. `null` becomes the
/// `"None"` sentinel text, and booleans and arrays are rendered as leaf text
/// since the tabular format has no representation for them.
impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => {
                let mut record = NestedRecord::new();
                for (key, val) in map {
                    record.insert(key, Node::from(val));
                }
                Node::Map(record)
            }
            serde_json::Value::String(s) => Node::Leaf(Scalar::Text(s)),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => Node::Leaf(Scalar::Number(v)),
                None => Node::Leaf(Scalar::Text(n.to_string())),
            },
            serde_json::Value::Bool(b) => Node::Leaf(Scalar::Text(b.to_string())),
            serde_json::Value::Null => Node::Leaf(Scalar::Text(NONE_CELL.to_string())),
            v @ serde_json::Value::Array(_) => Node::Leaf(Scalar::Text(v.to_string())),
        }
    }
}

impl From<&Node> for serde_json::Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Leaf(Scalar::Number(v)) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Node::Leaf(Scalar::Text(s)) => serde_json::Value::String(s.clone()),
            Node::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_number() {
        assert_eq!(Scalar::decode("3.14"), Scalar::Number(3.14));
        assert_eq!(Scalar::decode("-2"), Scalar::Number(-2.0));
        assert_eq!(Scalar::decode("1e3"), Scalar::Number(1000.0));
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(Scalar::decode("abc"), Scalar::Text("abc".to_string()));
        assert_eq!(Scalar::decode(""), Scalar::Text(String::new()));
    }

    #[test]
    fn test_decode_sentinel_stays_text() {
        // "None" is only meaningful to row filtering, not to the coder
        assert_eq!(Scalar::decode("None"), Scalar::Text("None".to_string()));
    }

    #[test]
    fn test_decode_is_one_way() {
        assert_eq!(Scalar::decode("1.0"), Scalar::decode("1"));
    }

    #[test]
    fn test_node_from_json() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"a": {"b": 1.5}, "c": "x", "d": null}"#).unwrap();
        let node = Node::from(value);
        let map = node.as_map().unwrap();
        let inner = map.get("a").unwrap().as_map().unwrap();
        assert_eq!(inner.get("b").unwrap().as_scalar(), Some(&Scalar::Number(1.5)));
        assert_eq!(
            map.get("d").unwrap().as_scalar(),
            Some(&Scalar::Text("None".to_string()))
        );
    }
}
