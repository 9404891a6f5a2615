//! A tagged, ordered list of qoids: the unit of file persistence.

use crate::container::{impl_container_ops, Children, Container, Probe};
use crate::node::{impl_tag_ordering, impl_tagged, NodeKind, Tagged};
use crate::{Property, Qoid, QoidOptions, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// A tag plus an ordered list of [`Qoid`] values, stored as one file.
///
/// `source` records where the collection was loaded from and `path` an
/// explicit save target. Neither takes part in equality.
///
/// # Examples
///
/// ```rust
/// use qoid::{qoid, Collection, Container};
///
/// let mut hosts = Collection::new("hosts");
/// hosts.append(qoid!("alpha"; "ip" => "10.0.0.1"));
/// hosts.append(qoid!("beta"; "ip" => "10.0.0.2"));
///
/// assert_eq!(hosts.to_text(), "#alpha\nip: 10.0.0.1\n\n#beta\nip: 10.0.0.2\n\n");
/// assert_eq!(Collection::from_text("hosts", &hosts.to_text()).unwrap(), hosts);
/// ```
#[derive(Debug)]
pub struct Collection {
    tag: String,
    qoids: Children<Qoid>,
    source: Option<PathBuf>,
    path: Option<PathBuf>,
    slot: Option<usize>,
}

impl Collection {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Collection {
            tag: tag.into(),
            qoids: Children::default(),
            source: None,
            path: None,
            slot: None,
        }
    }

    #[must_use]
    pub fn with_qoids<I>(tag: impl Into<String>, qoids: I) -> Self
    where
        I: IntoIterator<Item = Qoid>,
    {
        let mut collection = Collection::new(tag);
        collection.extend(qoids);
        collection
    }

    /// Sets the explicit save target.
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

    /// Path this collection was loaded from.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Explicit save target.
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

    /// A qoid tagged like this collection listing its qoid tags as
    /// empty-valued properties.
    #[must_use]
    pub fn glossary(&self) -> Qoid {
        Qoid::with_properties(
            self.tag.clone(),
            self.qoids.iter().map(|q| Property::new(q.tag(), "")),
        )
    }

    /// A copy with the tag lowercased. `source` and `path` are kept.
    #[must_use]
    pub fn lower(&self) -> Collection {
        let mut out = self.clone();
        out.tag = out.tag.to_lowercase();
        out
    }

    /// Parses collection markup, giving the result `tag`.
    ///
    /// # Errors
    ///
    /// [`Error::Format`](crate::Error::Format) on malformed text.
    pub fn from_text(tag: impl Into<String>, text: &str) -> Result<Collection> {
        crate::parse_collection(tag, text)
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
    pub fn from_json(json: &str) -> Result<Collection> {
        crate::from_json(json)
    }
}

impl_tagged!(Collection, NodeKind::Collection);
impl_tag_ordering!(Collection);
impl_container_ops!(Collection, Qoid);

impl Container for Collection {
    type Child = Qoid;

    fn children(&self) -> &Children<Qoid> {
        &self.qoids
    }

    fn children_mut(&mut self) -> &mut Children<Qoid> {
        &mut self.qoids
    }
}

impl Probe<Collection> for Collection {
    fn matches(&self, candidate: &Collection) -> bool {
        self == candidate
    }
}

impl Clone for Collection {
    fn clone(&self) -> Self {
        Collection {
            tag: self.tag.clone(),
            qoids: self.qoids.clone(),
            source: self.source.clone(),
            path: self.path.clone(),
            slot: None,
        }
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.qoids == other.qoids
    }
}

impl Eq for Collection {}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
