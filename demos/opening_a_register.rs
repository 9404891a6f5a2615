//! Walking a register tree loaded from disk.
//!
//! Run with: cargo run --example opening_a_register

use qoid::{qoid, Collection, Container, Entry, Persist, Register, Tagged};
use std::error::Error;

fn walk(register: &Register, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}/ {}", indent, register.tag());
    for entry in register.iter() {
        match entry {
            Entry::Collection(collection) => {
                println!("{}  % {} ({} qoids)", indent, collection.tag(), collection.len());
            }
            Entry::Register(inner) => walk(inner, depth + 1),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::temp_dir().join("qoid-demo").join("library.cxr");

    let mut shelf = Register::new("shelf.cxr");
    shelf.append(Collection::with_qoids("books.cxr", [qoid!("dune"; "author" => "Herbert")]));
    let mut library = Register::new("library.cxr").with_path(&path);
    library.append(Collection::with_qoids("readers.meta", [qoid!("ann")]));
    library.append(shelf);
    library.save()?;

    let opened = Register::open(&path)?;
    walk(&opened, 0);

    for collection in opened.collections() {
        if let Some(source) = collection.source() {
            println!("{} loaded from {}", collection.tag(), source.display());
        }
    }

    println!("JSON: {}", opened.to_json()?);

    Ok(())
}
