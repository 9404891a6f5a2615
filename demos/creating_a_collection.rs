//! Building a collection in memory and saving it as a `.cxr` file.
//!
//! Run with: cargo run --example creating_a_collection

use qoid::{qoid, Collection, Container, Persist, Property, Qoid};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut servers = Collection::new("servers");

    // Literal construction with the qoid! macro
    servers.append(qoid!("web"; "host" => "10.0.0.1", "port" => "80", "port" => "443"));

    // Step by step, duplicates allowed
    let mut db = Qoid::new("db");
    db.append(Property::new("host", "10.0.0.2"));
    db.append(Property::new("replica", "10.0.0.3"));
    db.append(Property::new("replica", "10.0.0.4"));
    db.append(Property::new("primary", ""));
    servers.append(db);

    println!("Markup:\n{}", servers.to_text());
    println!("JSON:\n{}\n", servers.to_json()?);

    let path = std::env::temp_dir().join("qoid-demo").join("servers.cxr");
    let servers = servers.with_path(&path);
    let written = servers.save()?;
    println!("Saved to {}", written.display());

    Ok(())
}
