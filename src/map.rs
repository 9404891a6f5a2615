//! Insertion-ordered grouping of property values by tag.
//!
//! [`TagMap`] wraps an [`IndexMap`] from tag to every value carried under
//! that tag, in first-seen tag order. It is the lossless map view of a
//! [`Qoid`](crate::Qoid): duplicate tags collapse into one key whose values
//! keep their original order.
//!
//! ## Examples
//!
//! ```rust
//! use qoid::{qoid, Qoid};
//!
//! let qoid = qoid!("colors"; "primary" => "red", "accent" => "gold", "primary" => "blue");
//! let map = qoid.grouped();
//!
//! assert_eq!(map.keys().collect::<Vec<_>>(), vec!["primary", "accent"]);
//! assert_eq!(map.get("primary"), Some(&["red".to_string(), "blue".to_string()][..]));
//! ```

use indexmap::IndexMap;

/// Tag to values, keyed in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap(IndexMap<String, Vec<String>>);

impl TagMap {
    #[must_use]
    pub fn new() -> Self {
        TagMap(IndexMap::new())
    }

    /// Appends `value` under `tag`, creating the key on first use.
    pub fn push(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.0.entry(tag.into()).or_default().push(value.into());
    }

    /// All values carried under `tag`, in order.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&[String]> {
        self.0.get(tag).map(Vec::as_slice)
    }

    /// First value carried under `tag`.
    #[must_use]
    pub fn first(&self, tag: &str) -> Option<&str> {
        self.get(tag).and_then(<[String]>::first).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, tag: &str) -> bool {
        self.0.contains_key(tag)
    }

    /// Number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a TagMap {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TagMap::new();
        for (tag, value) in iter {
            map.push(tag, value);
        }
        map
    }
}
