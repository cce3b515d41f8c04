//! # flatcsv
//!
//! A Rust library for converting between flat tabular delimited data and
//! nested key-value structures, plus basic read/write/append operations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flatcsv::{append_csv_rows, flatten, LoadOptions, load_csv_rows, NestedRecord, Node};
//!
//! // Flatten a nested record into dotted-path fields
//! let mut user = NestedRecord::new();
//! user.insert("name".to_string(), Node::from("ada"));
//! let mut scores = NestedRecord::new();
//! scores.insert("math".to_string(), Node::from(97.0));
//! user.insert("scores".to_string(), Node::Map(scores));
//! let flat = flatten(&user).unwrap(); // {"name": "ada", "scores.math": 97}
//!
//! // Append to a table, growing the header if needed
//! append_csv_rows("users.tsv", &[flat], None).unwrap();
//!
//! // Load it back, skipping incomplete rows
//! let options = LoadOptions { filter_incomplete: true, ..Default::default() };
//! let rows = load_csv_rows("users.tsv", &options).unwrap();
//! println!("Rows: {}", rows.len());
//! ```
//!
//! ## Features
//!
//! - Flatten/unflatten between nested mappings and dotted-path flat mappings
//! - Tab-separated read/write with float-or-string cell coercion
//! - Header-reconciling appends: append in place when the header fits,
//!   rewrite with the union header when new fields appear
//! - Export for document-store collections via a single `find` capability

pub mod csv;
pub mod error;
pub mod flatten;
pub mod record;
pub mod store;
pub mod table;

#[cfg(feature = "python")]
pub mod python;

pub use crate::csv::{
    LoadOptions, append_csv_rows, load_csv_columns, load_csv_rows, map_columns, write_csv,
    write_csv_columns, write_csv_headers_rows, write_csv_rows,
};
pub use crate::error::{Result, TableError};
pub use crate::flatten::{flatten, unflatten};
pub use crate::record::{FlatRecord, NONE_CELL, NestedRecord, Node, Scalar};
pub use crate::store::{DocumentSource, write_collection};
pub use crate::table::{Header, RowTuple, rows_to_tuples};
