//! Example: Flatten nested records and write them as a tab-separated table

use flatcsv::{NestedRecord, Node, flatten, write_csv_rows};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut scores = NestedRecord::new();
    scores.insert("math".to_string(), Node::from(97.0));
    scores.insert("physics".to_string(), Node::from(88.5));

    let mut user = NestedRecord::new();
    user.insert("name".to_string(), Node::from("ada"));
    user.insert("scores".to_string(), Node::Map(scores));

    let flat = flatten(&user)?;
    println!("Fields: {}", flat.len());
    for (path, value) in &flat {
        println!("  {} = {}", path, value);
    }

    write_csv_rows("users.tsv", &[flat], None)?;
    println!("\nWrote users.tsv");

    Ok(())
}
