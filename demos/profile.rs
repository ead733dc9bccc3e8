//! Validating a profile and printing it as YAML.
//!
//! Run with: cargo run --example profile
//!
//! Pipeline stages log at debug level to stderr.

use std::error::Error;
use structured_yaml::{check, process, structured, to_yaml, Schema};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let data = structured!({
        "name": "John Doe",
        "age": 30,
        "active": true,
        "hobbies": ["reading", "coding", "hiking"],
        "address": {
            "street": "123 Main St",
            "city": "Anytown",
            "zip": "12345"
        }
    });

    // Separate validation and conversion
    check(&data, None)?;
    let yaml = to_yaml(&data)?;

    println!("YAML output:");
    println!("{}", yaml);

    // Combined, with a schema
    let schema = Schema::mapping()
        .required("name", Schema::string().min_length(1))
        .required("age", Schema::integer().non_negative())
        .optional("hobbies", Schema::sequence(Schema::string()))
        .optional(
            "address",
            Schema::mapping()
                .required("city", Schema::string())
                .required("zip", Schema::string().min_length(5).max_length(5)),
        );
    let checked = process(&data, Some(&schema))?;
    assert_eq!(checked, yaml);

    let invalid = structured!({ "name": "Jane", "age": (-5) });
    if let Err(err) = process(&invalid, Some(&schema)) {
        println!("Rejected: {}", err);
    }

    Ok(())
}
