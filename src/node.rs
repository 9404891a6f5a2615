//! Node kinds, parent links and the closed [`Node`] variant.
//!
//! Every element of a Qoid tree implements [`Tagged`]. A child's link to its
//! owner is a [`ParentLink`]: the owner's kind plus the child's position in
//! the owner's value-list. Links are written only by the owning container
//! when it inserts or removes children, so callers can read them but never
//! forge them.
//!
//! [`Node`] wraps the four node kinds for operations whose operand kinds are
//! only known at runtime. Incompatible operands fail with
//! [`Error::TypeMismatch`].
//!
//! ## Examples
//!
//! ```rust
//! use qoid::{Collection, Container, Node, Property, Qoid, Tagged};
//!
//! let mut qoid = Node::from(Qoid::new("server"));
//! qoid.combine(&Node::from(Property::new("port", "8080"))).unwrap();
//! assert!(qoid.contains_tag("port"));
//!
//! let err = qoid.combine(&Node::from(Collection::new("hosts")));
//! assert!(err.is_err());
//! ```

use crate::ser::{Markup, Serializer};
use crate::{Collection, Container, Error, Property, Qoid, Register, Result};
use serde::{Serialize, Serializer as SerdeSerializer};
use std::cmp::Ordering;
use std::fmt;

pub(crate) mod sealed {
    /// Link bookkeeping reserved for owning containers.
    pub trait Linked {
        fn attach(&mut self, position: usize);
        fn detach(&mut self);
    }
}

/// The closed set of node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Property,
    Qoid,
    Collection,
    Register,
}

impl NodeKind {
    /// The kind of container that owns nodes of this kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qoid::NodeKind;
    ///
    /// assert_eq!(NodeKind::Property.parent_kind(), NodeKind::Qoid);
    /// assert_eq!(NodeKind::Collection.parent_kind(), NodeKind::Register);
    /// ```
    #[must_use]
    pub const fn parent_kind(self) -> NodeKind {
        match self {
            NodeKind::Property => NodeKind::Qoid,
            NodeKind::Qoid => NodeKind::Collection,
            NodeKind::Collection | NodeKind::Register => NodeKind::Register,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Property => "property",
            NodeKind::Qoid => "qoid",
            NodeKind::Collection => "collection",
            NodeKind::Register => "register",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-owning back-reference from a child to the container holding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentLink {
    kind: NodeKind,
    position: usize,
}

impl ParentLink {
    /// Kind of the owning container.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Index of the child in the owner's value-list.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }
}

/// Shared shape of every tree element: a tag and an optional parent link.
pub trait Tagged: sealed::Linked {
    fn tag(&self) -> &str;

    fn kind(&self) -> NodeKind;

    /// Position inside the owning container, if any.
    fn position(&self) -> Option<usize>;

    fn parent(&self) -> Option<ParentLink> {
        self.position().map(|position| ParentLink {
            kind: self.kind().parent_kind(),
            position,
        })
    }

    fn has_parent(&self) -> bool {
        self.position().is_some()
    }
}

/// Implements [`Tagged`] and the sealed link hooks for a struct with `tag`
/// and `slot` fields.
macro_rules! impl_tagged {
    ($ty:ty, $kind:expr) => {
        impl $crate::node::sealed::Linked for $ty {
            fn attach(&mut self, position: usize) {
                self.slot = Some(position);
            }

            fn detach(&mut self) {
                self.slot = None;
            }
        }

        impl $crate::node::Tagged for $ty {
            fn tag(&self) -> &str {
                &self.tag
            }

            fn kind(&self) -> $crate::node::NodeKind {
                $kind
            }

            fn position(&self) -> Option<usize> {
                self.slot
            }
        }
    };
}

/// Orders by tag only, returning `None` for equal tags with different content
/// so that ordering never contradicts structural equality.
macro_rules! impl_tag_ordering {
    ($ty:ty) => {
        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                use $crate::node::Tagged;
                match self.tag().cmp(other.tag()) {
                    std::cmp::Ordering::Equal if self != other => None,
                    ordering => Some(ordering),
                }
            }
        }
    };
}

pub(crate) use impl_tag_ordering;
pub(crate) use impl_tagged;

/// Any node of a Qoid tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Property(Property),
    Qoid(Qoid),
    Collection(Collection),
    Register(Register),
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Property(_) => NodeKind::Property,
            Node::Qoid(_) => NodeKind::Qoid,
            Node::Collection(_) => NodeKind::Collection,
            Node::Register(_) => NodeKind::Register,
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Node::Property(p) => p.tag(),
            Node::Qoid(q) => q.tag(),
            Node::Collection(c) => c.tag(),
            Node::Register(r) => r.tag(),
        }
    }

    /// Tag-only lexicographic comparison.
    #[must_use]
    pub fn compare(&self, other: &Node) -> Ordering {
        self.tag().cmp(other.tag())
    }

    /// Number of direct children; a property has none.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Node::Property(_) => 0,
            Node::Qoid(q) => q.len(),
            Node::Collection(c) => c.len(),
            Node::Register(r) => r.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `probe` structurally equals a direct child of this node.
    #[must_use]
    pub fn contains(&self, probe: &Node) -> bool {
        match (self, probe) {
            (Node::Qoid(q), Node::Property(p)) => q.contains(p),
            (Node::Collection(c), Node::Qoid(q)) => c.contains(q),
            (Node::Register(r), Node::Collection(c)) => r.contains(c),
            (Node::Register(r), Node::Register(inner)) => r.contains(inner),
            _ => false,
        }
    }

    /// Whether a direct child carries `tag`.
    #[must_use]
    pub fn contains_tag(&self, tag: &str) -> bool {
        match self {
            Node::Property(_) => false,
            Node::Qoid(q) => q.contains(tag),
            Node::Collection(c) => c.contains(tag),
            Node::Register(r) => r.contains(tag),
        }
    }

    /// Appends `other` (an element) or its elements (a container of the same
    /// kind) to this node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when `other` is neither an element nor
    /// a same-kind container, and always for a property target.
    pub fn combine(&mut self, other: &Node) -> Result<()> {
        match (self, other) {
            (Node::Qoid(q), Node::Property(p)) => q.append(p.clone()),
            (Node::Qoid(q), Node::Qoid(o)) => q.combine(o),
            (Node::Collection(c), Node::Qoid(q)) => c.append(q.clone()),
            (Node::Collection(c), Node::Collection(o)) => c.combine(o),
            (Node::Register(r), Node::Collection(c)) => r.append(c.clone()),
            (Node::Register(r), Node::Register(o)) => r.combine(o),
            (target, other) => return Err(Error::type_mismatch(target.accepts(), other.kind())),
        }
        Ok(())
    }

    /// Non-mutating form of [`Node::combine`].
    ///
    /// # Errors
    ///
    /// Same as [`Node::combine`].
    pub fn combined(&self, other: &Node) -> Result<Node> {
        let mut out = self.clone();
        out.combine(other)?;
        Ok(out)
    }

    /// Removes the first structural match of `other` (an element) or of each
    /// of its elements (a same-kind container). Misses are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for incompatible operand kinds.
    pub fn subtract(&mut self, other: &Node) -> Result<()> {
        match (self, other) {
            (Node::Qoid(q), Node::Property(p)) => *q -= p,
            (Node::Qoid(q), Node::Qoid(o)) => q.subtract(o),
            (Node::Collection(c), Node::Qoid(q)) => *c -= q,
            (Node::Collection(c), Node::Collection(o)) => c.subtract(o),
            (Node::Register(r), Node::Collection(c)) => *r -= c,
            (Node::Register(r), Node::Register(o)) => r.subtract(o),
            (target, other) => return Err(Error::type_mismatch(target.accepts(), other.kind())),
        }
        Ok(())
    }

    /// Non-mutating form of [`Node::subtract`].
    ///
    /// # Errors
    ///
    /// Same as [`Node::subtract`].
    pub fn subtracted(&self, other: &Node) -> Result<Node> {
        let mut out = self.clone();
        out.subtract(other)?;
        Ok(out)
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        crate::to_string(self)
    }

    /// # Errors
    ///
    /// Returns [`Error::MalformedDocument`] if JSON encoding fails.
    pub fn to_json(&self) -> Result<String> {
        crate::to_json(self)
    }

    fn accepts(&self) -> &'static str {
        match self {
            Node::Property(_) => "a container (properties are leaves)",
            Node::Qoid(_) => "property or qoid",
            Node::Collection(_) => "qoid or collection",
            Node::Register(_) => "collection or register",
        }
    }
}

impl From<Property> for Node {
    fn from(value: Property) -> Self {
        Node::Property(value)
    }
}

impl From<Qoid> for Node {
    fn from(value: Qoid) -> Self {
        Node::Qoid(value)
    }
}

impl From<Collection> for Node {
    fn from(value: Collection) -> Self {
        Node::Collection(value)
    }
}

impl From<Register> for Node {
    fn from(value: Register) -> Self {
        Node::Register(value)
    }
}

impl Markup for Node {
    fn write_markup(&self, serializer: &mut Serializer) {
        match self {
            Node::Property(p) => p.write_markup(serializer),
            Node::Qoid(q) => q.write_markup(serializer),
            Node::Collection(c) => c.write_markup(serializer),
            Node::Register(r) => r.write_markup(serializer),
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: SerdeSerializer,
    {
        match self {
            Node::Property(p) => p.serialize(serializer),
            Node::Qoid(q) => q.serialize(serializer),
            Node::Collection(c) => c.serialize(serializer),
            Node::Register(r) => r.serialize(serializer),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Qoid {
        let mut qoid = Qoid::new("server");
        qoid.append(Property::new("host", "localhost"));
        qoid
    }

    #[test]
    fn test_combine_element_and_container() {
        let mut node = Node::from(server());
        node.combine(&Node::from(Property::new("port", "80"))).unwrap();
        node.combine(&Node::from(server())).unwrap();
        assert_eq!(node.len(), 3);
        assert!(node.contains(&Node::from(Property::new("port", "80"))));
    }

    #[test]
    fn test_combine_mismatched_kinds() {
        let mut node = Node::from(server());
        let err = node.combine(&Node::from(Register::new("r"))).unwrap_err();
        match err {
            Error::TypeMismatch { expected, found } => {
                assert_eq!(expected, "property or qoid");
                assert_eq!(found, "register");
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_property_target_is_a_leaf() {
        let mut node = Node::from(Property::new("a", "1"));
        assert!(node.combine(&Node::from(Property::new("b", "2"))).is_err());
        assert!(node.subtract(&Node::from(Property::new("a", "1"))).is_err());
    }

    #[test]
    fn test_subtracted_leaves_original() {
        let node = Node::from(server());
        let out = node
            .subtracted(&Node::from(Property::new("host", "localhost")))
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(node.len(), 1);
    }

    #[test]
    fn test_register_accepts_collections() {
        let mut node = Node::from(Register::new("root"));
        node.combine(&Node::from(Collection::new("hosts"))).unwrap();
        assert!(node.contains_tag("hosts"));
        assert_eq!(node.kind(), NodeKind::Register);
    }

    #[test]
    fn test_compare_is_tag_only() {
        let a = Node::from(Qoid::new("a"));
        let b = Node::from(server());
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(NodeKind::Qoid.to_string(), "qoid");
    }
}
