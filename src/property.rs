//! The leaf of a Qoid tree.

use crate::node::{impl_tag_ordering, impl_tagged, NodeKind};
use std::fmt;

/// An atomic tag-value pair.
///
/// # Examples
///
/// ```rust
/// use qoid::{Property, Tagged};
///
/// let mut property = Property::new("Name", "Ada");
/// assert_eq!(property.tag(), "Name");
/// assert_eq!(property.value(), "Ada");
///
/// property.set_value("Grace");
/// assert_eq!(property.to_string(), "Name: Grace");
/// assert_eq!(property.lower().tag(), "name");
/// ```
#[derive(Debug)]
pub struct Property {
    tag: String,
    value: String,
    slot: Option<usize>,
}

impl Property {
    #[must_use]
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Property {
            tag: tag.into(),
            value: value.into(),
            slot: None,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// A standalone copy with the tag lowercased.
    #[must_use]
    pub fn lower(&self) -> Property {
        Property::new(self.tag.to_lowercase(), self.value.clone())
    }

    /// Whether the value is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl_tagged!(Property, NodeKind::Property);
impl_tag_ordering!(Property);

impl Clone for Property {
    fn clone(&self) -> Self {
        Property::new(self.tag.clone(), self.value.clone())
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.value == other.value
    }
}

impl Eq for Property {}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            f.write_str(&self.tag)
        } else {
            write!(f, "{}: {}", self.tag, self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tagged;

    #[test]
    fn test_equality_ignores_link() {
        let mut linked = Property::new("a", "1");
        crate::node::sealed::Linked::attach(&mut linked, 3);
        assert_eq!(linked, Property::new("a", "1"));
        assert_eq!(linked.parent().map(|p| p.position()), Some(3));
        assert!(!linked.clone().has_parent());
    }

    #[test]
    fn test_ordering_by_tag() {
        assert!(Property::new("a", "9") < Property::new("b", "1"));
        assert_eq!(
            Property::new("a", "1").partial_cmp(&Property::new("a", "2")),
            None
        );
        assert_eq!(
            Property::new("a", "1").partial_cmp(&Property::new("a", "1")),
            Some(std::cmp::Ordering::Equal)
        );
    }

    #[test]
    fn test_empty_value_display() {
        assert_eq!(Property::new("flag", "").to_string(), "flag");
        assert!(Property::new("flag", "").is_empty());
    }
}
