//! Nesting collections into registers and saving the folder tree.
//!
//! Run with: cargo run --example creating_registers

use qoid::{qoid, Collection, Container, Key, Persist, Register};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut q1 = Collection::new("q1.cxr");
    q1.append(qoid!("jan"; "sold" => "12", "returned" => "1"));
    q1.append(qoid!("feb"; "sold" => "9"));

    let mut archive = Register::new("archive.cxr");
    archive.append(q1);

    let mut inventory = Register::new("inventory.cxr")
        .with_path(std::env::temp_dir().join("qoid-demo").join("inventory.cxr"));
    inventory.append(Collection::with_qoids(
        "tools",
        [qoid!("hammer"; "weight" => "1kg"), qoid!("saw")],
    ));
    inventory.append(archive);

    println!("Register markup:\n{}", inventory.to_text());

    let target = inventory.path_of(&[Key::Tag("archive.cxr"), Key::Tag("q1.cxr")])?;
    println!("q1 will be written to {}", target.display());

    let written = inventory.save()?;
    println!("Saved register to {}", written.display());

    Ok(())
}
