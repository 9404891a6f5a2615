//! A tagged, ordered list of collections and nested registers: the unit of
//! folder persistence.
//!
//! A [`Register`] mirrors a `.cxr` folder. Its children are [`Entry`]
//! values, each either a [`Collection`] (a file) or a nested [`Register`]
//! (a sub-folder), to any depth.
//!
//! ## Operators
//!
//! `register += collection` appends one collection. Between two registers,
//! `+=`/`-=` follow the container contract and combine or subtract their
//! *children*; append a nested register with [`Container::append`].
//!
//! ```rust
//! use qoid::{Collection, Container, Register};
//!
//! let mut root = Register::new("root.cxr");
//! root += Collection::new("hosts");
//! root.append(Register::new("archive.cxr"));
//!
//! assert_eq!(root.len(), 2);
//! assert_eq!(root.collections().count(), 1);
//! assert_eq!(root.registers().count(), 1);
//! ```

use crate::container::{impl_container_ops, Children, Container, Probe};
use crate::node::sealed::Linked;
use crate::node::{impl_tag_ordering, impl_tagged, NodeKind, Tagged};
use crate::{Collection, QoidOptions, Result};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::path::{Path, PathBuf};

/// A child of a [`Register`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Collection(Collection),
    Register(Register),
}

impl Entry {
    #[must_use]
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Entry::Collection(c) => Some(c),
            Entry::Register(_) => None,
        }
    }

    pub fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        match self {
            Entry::Collection(c) => Some(c),
            Entry::Register(_) => None,
        }
    }

    #[must_use]
    pub fn as_register(&self) -> Option<&Register> {
        match self {
            Entry::Register(r) => Some(r),
            Entry::Collection(_) => None,
        }
    }

    pub fn as_register_mut(&mut self) -> Option<&mut Register> {
        match self {
            Entry::Register(r) => Some(r),
            Entry::Collection(_) => None,
        }
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        match self {
            Entry::Collection(c) => c.source(),
            Entry::Register(r) => r.source(),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Entry::Collection(c) => c.path(),
            Entry::Register(r) => r.path(),
        }
    }
}

impl Linked for Entry {
    fn attach(&mut self, position: usize) {
        match self {
            Entry::Collection(c) => c.attach(position),
            Entry::Register(r) => r.attach(position),
        }
    }

    fn detach(&mut self) {
        match self {
            Entry::Collection(c) => c.detach(),
            Entry::Register(r) => r.detach(),
        }
    }
}

impl Tagged for Entry {
    fn tag(&self) -> &str {
        match self {
            Entry::Collection(c) => c.tag(),
            Entry::Register(r) => r.tag(),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Entry::Collection(_) => NodeKind::Collection,
            Entry::Register(_) => NodeKind::Register,
        }
    }

    fn position(&self) -> Option<usize> {
        match self {
            Entry::Collection(c) => c.position(),
            Entry::Register(r) => r.position(),
        }
    }
}

impl_tag_ordering!(Entry);

impl From<Collection> for Entry {
    fn from(collection: Collection) -> Self {
        Entry::Collection(collection)
    }
}

impl From<Register> for Entry {
    fn from(register: Register) -> Self {
        Entry::Register(register)
    }
}

impl Probe<Entry> for Entry {
    fn matches(&self, candidate: &Entry) -> bool {
        self == candidate
    }
}

impl Probe<Entry> for Collection {
    fn matches(&self, candidate: &Entry) -> bool {
        candidate.as_collection() == Some(self)
    }
}

impl Probe<Entry> for Register {
    fn matches(&self, candidate: &Entry) -> bool {
        candidate.as_register() == Some(self)
    }
}

/// A tag plus an ordered list of collections and nested registers, stored
/// as one folder.
#[derive(Debug)]
pub struct Register {
    tag: String,
    entries: Children<Entry>,
    source: Option<PathBuf>,
    path: Option<PathBuf>,
    slot: Option<usize>,
}

impl Register {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Register {
            tag: tag.into(),
            entries: Children::default(),
            source: None,
            path: None,
            slot: None,
        }
    }

    #[must_use]
    pub fn with_entries<I>(tag: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        let mut register = Register::new(tag);
        register.extend(entries);
        register
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub(crate) fn set_source(&mut self, source: impl Into<PathBuf>) {
        self.source = Some(source.into());
    }

    /// Direct collection children, in order.
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.entries.iter().filter_map(Entry::as_collection)
    }

    /// Direct register children, in order.
    pub fn registers(&self) -> impl Iterator<Item = &Register> {
        self.entries.iter().filter_map(Entry::as_register)
    }

    /// A copy with the tag lowercased.
    #[must_use]
    pub fn lower(&self) -> Register {
        let mut out = self.clone();
        out.tag = out.tag.to_lowercase();
        out
    }

    /// Parses register markup; the tag comes from the `/ <tag>` header.
    ///
    /// # Errors
    ///
    /// [`Error::Format`](crate::Error::Format) on malformed text.
    pub fn from_text(text: &str) -> Result<Register> {
        crate::parse_register(text)
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        crate::to_string(self)
    }

    #[must_use]
    pub fn to_text_with(&self, options: &QoidOptions) -> String {
        crate::to_string_with_options(self, options)
    }

    /// # Errors
    ///
    /// [`Error::MalformedDocument`](crate::Error::MalformedDocument) if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        crate::to_json(self)
    }

    /// # Errors
    ///
    /// [`Error::MalformedDocument`](crate::Error::MalformedDocument) on a shape violation.
    pub fn from_json(json: &str) -> Result<Register> {
        crate::from_json(json)
    }
}

impl_tagged!(Register, NodeKind::Register);
impl_tag_ordering!(Register);
impl_container_ops!(Register, Entry);

impl Container for Register {
    type Child = Entry;

    fn children(&self) -> &Children<Entry> {
        &self.entries
    }

    fn children_mut(&mut self) -> &mut Children<Entry> {
        &mut self.entries
    }
}

impl AddAssign<Collection> for Register {
    fn add_assign(&mut self, collection: Collection) {
        self.append(collection);
    }
}

impl Add<Collection> for Register {
    type Output = Register;

    fn add(mut self, collection: Collection) -> Register {
        self += collection;
        self
    }
}

impl SubAssign<&Collection> for Register {
    fn sub_assign(&mut self, collection: &Collection) {
        if let Some(index) = self.index_of(collection) {
            let _ = self.delete(index);
        }
    }
}

impl Sub<&Collection> for Register {
    type Output = Register;

    fn sub(mut self, collection: &Collection) -> Register {
        self -= collection;
        self
    }
}

impl Clone for Register {
    fn clone(&self) -> Self {
        Register {
            tag: self.tag.clone(),
            entries: self.entries.clone(),
            source: self.source.clone(),
            path: self.path.clone(),
            slot: None,
        }
    }
}

impl PartialEq for Register {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.entries == other.entries
    }
}

impl Eq for Register {}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{qoid, NodeKind};

    fn tree() -> Register {
        let mut inner = Register::new("archive.cxr");
        inner.append(Collection::with_qoids("old", [qoid!("x"; "k" => "v")]));

        let mut root = Register::new("root.cxr");
        root.append(Collection::with_qoids("hosts", [qoid!("alpha"; "ip" => "1")]));
        root.append(inner);
        root
    }

    #[test]
    fn test_entry_links() {
        let root = tree();
        let archive = root.get("archive.cxr").unwrap();
        assert_eq!(archive.kind(), NodeKind::Register);
        assert_eq!(archive.parent().unwrap().kind(), NodeKind::Register);
        assert_eq!(archive.parent().unwrap().position(), 1);

        let nested = archive.as_register().unwrap().get(0).unwrap();
        assert_eq!(nested.position(), Some(0));
    }

    #[test]
    fn test_collection_operators() {
        let hosts = Collection::with_qoids("hosts", [qoid!("alpha"; "ip" => "1")]);
        let mut root = tree();
        assert!(root.contains(&hosts));

        root -= &hosts;
        assert!(!root.contains("hosts"));
        assert_eq!(root.get(0).unwrap().position(), Some(0));

        let root = root + hosts;
        assert_eq!(root.tags(), vec!["archive.cxr", "hosts"]);
    }

    #[test]
    fn test_register_plus_register_combines_children() {
        let combined = tree() + &tree();
        assert_eq!(combined.len(), 4);
        let halved = combined - &tree();
        assert_eq!(halved, tree());
        assert!((halved - &tree()).is_empty());
    }

    #[test]
    fn test_delete_unlinks_entry() {
        let mut root = tree();
        let removed = root.delete("archive.cxr").unwrap();
        assert!(!removed.has_parent());
        assert!(removed.as_register().unwrap().get(0).unwrap().has_parent());
    }

    #[test]
    fn test_filters() {
        let root = tree();
        assert_eq!(root.collections().map(Tagged::tag).collect::<Vec<_>>(), vec!["hosts"]);
        assert_eq!(
            root.registers().map(Tagged::tag).collect::<Vec<_>>(),
            vec!["archive.cxr"]
        );
    }
}
