//! # qoid
//!
//! Qoid markup: hierarchical tag-value records with duplicate tags permitted
//! at every level, a line-oriented text codec, a JSON interchange format and
//! a file/folder persistence mapping.
//!
//! ## The Tree
//!
//! - **[`Property`]**: a leaf tag-value pair
//! - **[`Qoid`]**: a tag plus ordered properties
//! - **[`Collection`]**: a tag plus ordered qoids, stored as one file
//! - **[`Register`]**: a tag plus ordered collections and nested registers,
//!   stored as one folder
//!
//! Tags never need to be unique and order always matters. Each container
//! owns its children; a child knows its position in its owner through a
//! read-only parent link ([`Tagged::parent`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use qoid::{qoid, parse_collection, to_string, Collection, Container};
//!
//! let mut servers = Collection::new("servers");
//! servers.append(qoid!("web"; "host" => "10.0.0.1", "port" => "80", "port" => "443"));
//! servers.append(qoid!("db"; "host" => "10.0.0.2"));
//!
//! let text = to_string(&servers);
//! assert_eq!(
//!     text,
//!     "#web\nhost: 10.0.0.1\nport: 80\nport: 443\n\n#db\nhost: 10.0.0.2\n\n"
//! );
//!
//! let back = parse_collection("servers", &text).unwrap();
//! assert_eq!(back, servers);
//! assert_eq!(back.get("web").unwrap().all_of("port"), vec!["80", "443"]);
//! ```
//!
//! ### Lookup Policy
//!
//! Tag keys resolve to the **first** matching child for
//! [`Container::get`], [`Container::set`] and [`Container::delete`];
//! [`Container::get_all`] returns every match.
//!
//! ### Combining Nodes
//!
//! ```rust
//! use qoid::{qoid, Container, Property};
//!
//! let c = qoid!("c"; "a" => "1", "b" => "2");
//! let d = qoid!("d"; "b" => "2");
//!
//! assert_eq!((c.clone() - &d).tags(), vec!["a"]);
//! assert_eq!((c.clone() + &d).tags(), vec!["a", "b", "b"]);
//! assert!(c.contains("b"));
//! assert!(c.contains(&Property::new("a", "1")));
//! ```
//!
//! ### Persistence
//!
//! ```rust,no_run
//! use qoid::{Collection, Persist, Register};
//!
//! let register = Register::open("inventory.cxr").unwrap();
//! for collection in register.collections() {
//!     println!("{}", collection.to_text());
//! }
//! register.save().unwrap();
//!
//! let notes = Collection::open("notes.txt").unwrap();
//! notes.save_json(&Default::default()).unwrap();
//! ```
//!
//! ## Logging
//!
//! Loading and saving emit [`tracing`] events (`debug` for skipped folder
//! entries and parse summaries, `info` for written paths). The library
//! installs no subscriber.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`creating_a_collection.rs`** - building and saving a collection
//! - **`opening_a_collection.rs`** - reading one back and querying it
//! - **`creating_registers.rs`** - nesting collections into folders
//! - **`opening_a_register.rs`** - walking a register tree
//!
//! Run any example with: `cargo run --example <name>`

pub mod collection;
pub mod container;
pub mod de;
pub mod error;
mod json;
pub mod macros;
pub mod map;
pub mod node;
pub mod options;
pub mod persist;
pub mod property;
mod qoid;
pub mod register;
pub mod ser;

pub use collection::Collection;
pub use container::{ChildMut, Children, Container, Key, Probe};
pub use de::Parser;
pub use error::{Error, Result};
pub use map::TagMap;
pub use node::{Node, NodeKind, ParentLink, Tagged};
pub use options::{Delimiter, QoidOptions};
pub use persist::{default_name, Persist, Storage};
pub use property::Property;
pub use qoid::Qoid;
pub use register::{Entry, Register};
pub use ser::{Markup, Serializer};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Writes any node as Qoid markup.
///
/// # Examples
///
/// ```rust
/// use qoid::{qoid, to_string};
///
/// assert_eq!(to_string(&qoid!("point"; "x" => "1")), "#point\nx: 1\n");
/// ```
#[must_use]
pub fn to_string<T>(value: &T) -> String
where
    T: ?Sized + Markup,
{
    to_string_with_options(value, &QoidOptions::default())
}

/// Writes any node as Qoid markup with custom options.
#[must_use]
pub fn to_string_with_options<T>(value: &T, options: &QoidOptions) -> String
where
    T: ?Sized + Markup,
{
    let mut serializer = Serializer::new(options.clone());
    value.write_markup(&mut serializer);
    serializer.into_inner()
}

/// Writes any node as Qoid markup to a writer.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Markup,
{
    to_writer_with_options(writer, value, &QoidOptions::default())
}

/// Writes any node as Qoid markup to a writer with custom options.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &QoidOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Markup,
{
    writer
        .write_all(to_string_with_options(value, options).as_bytes())
        .map_err(|e| Error::io(Path::new("<writer>"), &e))
}

/// Parses collection markup, naming the result `tag`.
///
/// # Errors
///
/// Returns [`Error::Format`] with the offending line on malformed input.
pub fn parse_collection(tag: impl Into<String>, text: &str) -> Result<Collection> {
    Parser::new(text).parse_collection(tag)
}

/// Parses register markup (`/ tag` ... `/`).
///
/// # Examples
///
/// ```rust
/// use qoid::{parse_register, Container};
///
/// let register = parse_register("/ root.cxr\n\n% hosts\n#a\nip: 1\n\n/\n").unwrap();
/// assert_eq!(register.tags(), vec!["hosts"]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Format`] with the offending line on malformed input.
pub fn parse_register(text: &str) -> Result<Register> {
    Parser::new(text).parse_register()
}

/// Parses text holding exactly one qoid.
///
/// # Errors
///
/// Returns [`Error::Format`] on malformed input or a qoid count other than one.
pub fn parse_qoid(text: &str) -> Result<Qoid> {
    Parser::new(text).parse_qoid()
}

/// Reads collection markup from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use qoid::{from_reader, Container};
/// use std::io::Cursor;
///
/// let collection = from_reader(Cursor::new(b"#a\nk: v\n"), "c").unwrap();
/// assert_eq!(collection.len(), 1);
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails and [`Error::Format`] on malformed
/// input.
pub fn from_reader<R>(mut reader: R, tag: impl Into<String>) -> Result<Collection>
where
    R: io::Read,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(Path::new("<reader>"), &e))?;
    parse_collection(tag, &text)
}

/// Encodes any node as compact JSON.
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] if encoding fails.
pub fn to_json<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(serde_json::to_string(value)?)
}

/// Encodes any node as indented JSON.
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] if encoding fails.
pub fn to_json_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(serde_json::to_string_pretty(value)?)
}

/// Decodes a node from its JSON form.
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] if the document does not have the
/// node's shape.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(json)?)
}
