//! Example: Append rows to an existing table, growing the header when needed

use flatcsv::{FlatRecord, LoadOptions, Scalar, append_csv_rows, load_csv_rows};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut first = FlatRecord::new();
    first.insert("trial".to_string(), Scalar::Number(1.0));
    first.insert("score".to_string(), Scalar::Number(0.82));
    append_csv_rows("results.tsv", &[first], None)?;

    // A later run records an extra field, forcing a header rewrite
    let mut second = FlatRecord::new();
    second.insert("trial".to_string(), Scalar::Number(2.0));
    second.insert("score".to_string(), Scalar::Number(0.91));
    second.insert("notes".to_string(), Scalar::Text("tuned lr".to_string()));
    append_csv_rows("results.tsv", &[second], None)?;

    let options = LoadOptions {
        filter_incomplete: true,
        ..Default::default()
    };
    let rows = load_csv_rows("results.tsv", &options)?;
    println!("Complete rows: {}", rows.len());

    Ok(())
}
