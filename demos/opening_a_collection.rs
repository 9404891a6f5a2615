//! Reading a collection from disk and querying it.
//!
//! Run with: cargo run --example opening_a_collection

use qoid::{Collection, Container, Persist, Tagged};
use std::error::Error;
use std::fs;

fn main() -> Result<(), Box<dyn Error>> {
    let dir = std::env::temp_dir().join("qoid-demo");
    fs::create_dir_all(&dir)?;
    let path = dir.join("contacts.txt");
    fs::write(
        &path,
        "#alice\nemail: alice@example.org\nphone: 555-0100\nphone: 555-0101\n\n\
         #bob\nemail: bob@example.org\n\n",
    )?;

    let contacts = Collection::open(&path)?;
    println!("Opened '{}' with {} qoids", contacts.tag(), contacts.len());

    for contact in contacts.iter() {
        let grouped = contact.grouped();
        for (tag, values) in &grouped {
            println!("{} {}: {}", contact.tag(), tag, values.join(", "));
        }
    }

    let alice = contacts.get("alice")?;
    println!("Alice's first phone: {}", alice.value_of("phone")?);
    println!("Glossary:\n{}", contacts.glossary().to_text());

    // A missing tag is an error, not a panic
    if let Err(err) = contacts.get("carol") {
        println!("Lookup failed: {}", err);
    }

    Ok(())
}
