//! Qoid markup serialization.
//!
//! This module provides the [`Serializer`] that writes Qoid trees as
//! line-oriented markup text, and the [`Markup`] trait implemented by every
//! node type.
//!
//! ## Layout
//!
//! - **Property**: `tag: value`, or `tag` alone for an empty value
//! - **Qoid**: `#tag` followed by its property lines
//! - **Collection**: each qoid followed by one blank line
//! - **Register**: `/ tag` and a blank line, then each child, then `/`.
//!   Collection children are introduced by a `% tag` header.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use qoid::{qoid, to_string, Collection, Container, Register};
//!
//! let mut root = Register::new("root.cxr");
//! root.append(Collection::with_qoids("hosts", [qoid!("alpha"; "ip" => "1")]));
//!
//! assert_eq!(
//!     to_string(&root),
//!     "/ root.cxr\n\n% hosts\n#alpha\nip: 1\n\n/\n"
//! );
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use qoid::{Markup, Property, QoidOptions, Serializer, Delimiter};
//!
//! let mut serializer = Serializer::new(QoidOptions::new().with_delimiter(Delimiter::Pipe));
//! Property::new("a", "1").write_markup(&mut serializer);
//! Property::new("flag", "").write_markup(&mut serializer);
//!
//! assert_eq!(serializer.into_inner(), "a| 1\nflag\n");
//! ```

use crate::node::Tagged;
use crate::{Collection, Container, Entry, Property, Qoid, QoidOptions, Register};

/// Anything that can be written as Qoid markup.
pub trait Markup {
    fn write_markup(&self, serializer: &mut Serializer);
}

/// The Qoid markup writer.
///
/// Created via [`Serializer::new`]; the text is taken out with
/// [`Serializer::into_inner`].
pub struct Serializer {
    output: String,
    options: QoidOptions,
}

impl Serializer {
    pub fn new(options: QoidOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn write_line(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn write_blank(&mut self) {
        self.output.push('\n');
    }

    pub fn write_property(&mut self, property: &Property) {
        self.output.push_str(property.tag());
        if !property.is_empty() {
            self.output.push(self.options.delimiter.as_char());
            self.output.push(' ');
            self.output.push_str(property.value());
        }
        self.output.push('\n');
    }

    pub fn write_qoid(&mut self, qoid: &Qoid) {
        self.output.push('#');
        self.write_line(qoid.tag());
        for property in qoid.iter() {
            self.write_property(property);
        }
    }

    /// Writes the qoids of `collection`, each closed by a blank line.
    pub fn write_collection(&mut self, collection: &Collection) {
        for qoid in collection.iter() {
            self.write_qoid(qoid);
            self.write_blank();
        }
    }

    pub fn write_register(&mut self, register: &Register) {
        self.output.push_str("/ ");
        self.write_line(register.tag());
        self.write_blank();
        for entry in register.iter() {
            self.write_entry(entry);
        }
        self.write_line("/");
    }

    fn write_entry(&mut self, entry: &Entry) {
        match entry {
            Entry::Collection(collection) => {
                self.output.push_str("% ");
                self.write_line(collection.tag());
                if collection.is_empty() {
                    self.write_blank();
                }
                self.write_collection(collection);
            }
            Entry::Register(register) => {
                self.write_register(register);
                self.write_blank();
            }
        }
    }
}

impl Markup for Property {
    fn write_markup(&self, serializer: &mut Serializer) {
        serializer.write_property(self);
    }
}

impl Markup for Qoid {
    fn write_markup(&self, serializer: &mut Serializer) {
        serializer.write_qoid(self);
    }
}

impl Markup for Collection {
    fn write_markup(&self, serializer: &mut Serializer) {
        serializer.write_collection(self);
    }
}

impl Markup for Register {
    fn write_markup(&self, serializer: &mut Serializer) {
        serializer.write_register(self);
    }
}

impl Markup for Entry {
    fn write_markup(&self, serializer: &mut Serializer) {
        match self {
            Entry::Collection(c) => serializer.write_collection(c),
            Entry::Register(r) => serializer.write_register(r),
        }
    }
}

impl<T: Markup + ?Sized> Markup for &T {
    fn write_markup(&self, serializer: &mut Serializer) {
        (**self).write_markup(serializer);
    }
}
