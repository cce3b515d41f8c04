use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::csv::append_csv_rows;
use crate::flatten::{flatten, unflatten};
use crate::record::{FlatRecord, Node};

fn flat_record_from_value(value: serde_json::Value) -> PyResult<FlatRecord> {
    let serde_json::Value::Object(map) = value else {
        return Err(PyValueError::new_err("expected a JSON object"));
    };
    let mut record = FlatRecord::new();
    for (key, val) in map {
        match Node::from(val) {
            Node::Leaf(scalar) => {
                record.insert(key, scalar);
            }
            Node::Map(_) => {
                return Err(PyValueError::new_err(format!(
                    "value for '{}' must be a scalar",
                    key
                )));
            }
        }
    }
    Ok(record)
}

/// Flatten a nested JSON object into a single-level object with dotted keys.
#[pyfunction]
fn flatten_json(json: &str) -> PyResult<String> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let Node::Map(record) = Node::from(value) else {
        return Err(PyValueError::new_err("expected a JSON object"));
    };
    let flat = flatten(&record).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let out: serde_json::Map<String, serde_json::Value> = flat
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::from(&Node::Leaf(v.clone()))))
        .collect();
    serde_json::to_string(&serde_json::Value::Object(out))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Rebuild a nested JSON object from a flat object with dotted keys.
#[pyfunction]
fn unflatten_json(json: &str) -> PyResult<String> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let flat = flat_record_from_value(value)?;
    let record = unflatten(&flat).map_err(|e| PyValueError::new_err(e.to_string()))?;
    serde_json::to_string(&serde_json::Value::from(&Node::Map(record)))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Append a JSON array of flat row objects to a tab-separated file,
/// reconciling headers.
#[pyfunction]
fn append_rows_json(path: &str, rows_json: &str) -> PyResult<()> {
    let value: serde_json::Value =
        serde_json::from_str(rows_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let serde_json::Value::Array(values) = value else {
        return Err(PyValueError::new_err("expected a JSON array of objects"));
    };
    let rows: Vec<FlatRecord> = values
        .into_iter()
        .map(flat_record_from_value)
        .collect::<PyResult<_>>()?;
    append_csv_rows(path, &rows, None).map_err(|e| PyIOError::new_err(e.to_string()))
}

/// A Python module implemented in Rust.
#[pymodule]
fn flatcsv(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(flatten_json, m)?)?;
    m.add_function(wrap_pyfunction!(unflatten_json, m)?)?;
    m.add_function(wrap_pyfunction!(append_rows_json, m)?)?;
    Ok(())
}
