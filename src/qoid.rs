//! A tagged, ordered list of properties.

use crate::container::{impl_container_ops, Children, Container, Probe};
use crate::node::{impl_tag_ordering, impl_tagged, NodeKind, Tagged};
use crate::{Error, Property, QoidOptions, Result, TagMap};
use std::fmt;

/// A tag plus an ordered list of [`Property`] values.
///
/// Duplicate property tags are kept in insertion order.
///
/// # Examples
///
/// ```rust
/// use qoid::{Container, Property, Qoid};
///
/// let mut qoid = Qoid::new("tag");
/// qoid.append(Property::new("tag1", "val1"));
/// qoid.append(Property::new("tag1", "val2"));
///
/// assert_eq!(qoid.to_text(), "#tag\ntag1: val1\ntag1: val2\n");
/// assert_eq!(Qoid::from_text(&qoid.to_text()).unwrap(), qoid);
/// ```
#[derive(Debug)]
pub struct Qoid {
    tag: String,
    properties: Children<Property>,
    slot: Option<usize>,
}

impl Qoid {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Qoid {
            tag: tag.into(),
            properties: Children::default(),
            slot: None,
        }
    }

    /// Creates a qoid holding `properties` in order.
    #[must_use]
    pub fn with_properties<I>(tag: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = Property>,
    {
        let mut qoid = Qoid::new(tag);
        qoid.extend(properties);
        qoid
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Property values, in order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.properties.iter().map(Property::value).collect()
    }

    /// Value of the first property tagged `tag`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if no property carries `tag`.
    pub fn value_of(&self, tag: &str) -> Result<&str> {
        self.get(tag).map(Property::value)
    }

    /// Every value carried under `tag`, in order.
    #[must_use]
    pub fn all_of(&self, tag: &str) -> Vec<&str> {
        self.get_all(tag).into_iter().map(Property::value).collect()
    }

    /// Values grouped by tag in first-seen order.
    #[must_use]
    pub fn grouped(&self) -> TagMap {
        self.properties
            .iter()
            .map(|p| (p.tag(), p.value()))
            .collect()
    }

    /// A standalone copy with the tag lowercased.
    #[must_use]
    pub fn lower(&self) -> Qoid {
        let mut out = self.clone();
        out.tag = out.tag.to_lowercase();
        out
    }

    /// Parses exactly one qoid from markup text.
    ///
    /// # Errors
    ///
    /// [`Error::Format`] if the text is not a single well-formed qoid.
    pub fn from_text(text: &str) -> Result<Qoid> {
        crate::parse_qoid(text)
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
    /// [`Error::MalformedDocument`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        crate::to_json(self)
    }

    /// # Errors
    ///
    /// [`Error::MalformedDocument`] unless `json` is
    /// `{"tag": [[tags...], [values...]]}` with equal-length lists.
    pub fn from_json(json: &str) -> Result<Qoid> {
        crate::from_json(json)
    }
}

impl_tagged!(Qoid, NodeKind::Qoid);
impl_tag_ordering!(Qoid);
impl_container_ops!(Qoid, Property);

impl Container for Qoid {
    type Child = Property;

    fn children(&self) -> &Children<Property> {
        &self.properties
    }

    fn children_mut(&mut self) -> &mut Children<Property> {
        &mut self.properties
    }
}

impl Probe<Property> for Property {
    fn matches(&self, candidate: &Property) -> bool {
        self == candidate
    }
}

impl Probe<Qoid> for Qoid {
    fn matches(&self, candidate: &Qoid) -> bool {
        self == candidate
    }
}

impl Clone for Qoid {
    fn clone(&self) -> Self {
        Qoid {
            tag: self.tag.clone(),
            properties: self.properties.clone(),
            slot: None,
        }
    }
}

impl PartialEq for Qoid {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.properties == other.properties
    }
}

impl Eq for Qoid {}

impl fmt::Display for Qoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl TryFrom<&str> for Qoid {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self> {
        Qoid::from_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tagged;

    fn pair() -> (Qoid, Qoid) {
        let c = Qoid::with_properties("c", [Property::new("a", "1"), Property::new("b", "2")]);
        let d = Qoid::with_properties("d", [Property::new("b", "2")]);
        (c, d)
    }

    #[test]
    fn test_subtract_and_combine() {
        let (c, d) = pair();

        let minus = c.clone() - &d;
        assert_eq!(minus.iter().cloned().collect::<Vec<_>>(), vec![Property::new("a", "1")]);

        let plus = c.clone() + &d;
        assert_eq!(
            plus.iter().cloned().collect::<Vec<_>>(),
            vec![
                Property::new("a", "1"),
                Property::new("b", "2"),
                Property::new("b", "2"),
            ]
        );
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_subtract_skips_misses() {
        let (mut c, _) = pair();
        c -= &Property::new("b", "999");
        assert_eq!(c.len(), 2);
        c -= &Property::new("b", "2");
        assert_eq!(c.tags(), vec!["a"]);
    }

    #[test]
    fn test_add_child_links_it() {
        let (c, _) = pair();
        let c = c + Property::new("z", "26");
        assert_eq!(c.get("z").unwrap().position(), Some(2));
    }

    #[test]
    fn test_value_lookups() {
        let qoid = Qoid::with_properties(
            "q",
            [
                Property::new("tag1", "val1"),
                Property::new("other", "x"),
                Property::new("tag1", "val2"),
            ],
        );
        assert_eq!(qoid.value_of("tag1").unwrap(), "val1");
        assert_eq!(qoid.all_of("tag1"), vec!["val1", "val2"]);
        assert_eq!(qoid.values(), vec!["val1", "x", "val2"]);
        assert!(qoid.value_of("missing").is_err());
        assert_eq!(qoid.grouped().len(), 2);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a = Qoid::with_properties("q", [Property::new("x", "1"), Property::new("y", "2")]);
        let b = Qoid::with_properties("q", [Property::new("y", "2"), Property::new("x", "1")]);
        assert_ne!(a, b);
        assert_eq!(a.partial_cmp(&b), None);
        assert!(Qoid::new("a") < Qoid::new("b"));
    }

    #[test]
    fn test_lower() {
        let q = Qoid::with_properties("MiXeD", [Property::new("K", "V")]);
        let lowered = q.lower();
        assert_eq!(lowered.tag(), "mixed");
        assert_eq!(lowered.get(0).unwrap().tag(), "K");
    }
}
