//! List semantics shared by [`Qoid`](crate::Qoid), [`Collection`](crate::Collection)
//! and [`Register`](crate::Register).
//!
//! Each container owns its children in a [`Children`] list. The list is the
//! only writer of the children's parent links: pushing a child links it,
//! removing it unlinks it, and any shift in positions relinks the rest.
//!
//! ## Lookup policy
//!
//! A [`Key`] is either a position or a tag. Tags are never unique, so tag
//! keys resolve to the **first** matching child for [`Container::get`],
//! [`Container::set`] and [`Container::delete`]. Use
//! [`Container::get_all`] to see every match.
//!
//! ## Examples
//!
//! ```rust
//! use qoid::{Container, Property, Qoid};
//!
//! let mut qoid = Qoid::new("colors");
//! qoid.append(Property::new("primary", "red"));
//! qoid.append(Property::new("primary", "blue"));
//!
//! assert_eq!(qoid.get("primary").unwrap().value(), "red");
//! assert_eq!(qoid.get_all("primary").len(), 2);
//! assert!(qoid.contains("primary"));
//! assert!(qoid.get(7).is_err());
//! ```

use crate::node::sealed::Linked;
use crate::node::Tagged;
use crate::{Error, Result};
use std::cmp::Ordering;
use std::ops::{Bound, Deref, DerefMut, Range, RangeBounds};

/// Ordered, link-maintaining list of a container's children.
///
/// Dereferences to a slice for read access.
#[derive(Debug, PartialEq)]
pub struct Children<T> {
    items: Vec<T>,
}

impl<T> Default for Children<T> {
    fn default() -> Self {
        Children { items: Vec::new() }
    }
}

impl<T> Deref for Children<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a Children<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Tagged> Children<T> {
    pub(crate) fn push(&mut self, mut item: T) {
        item.attach(self.items.len());
        self.items.push(item);
    }

    pub(crate) fn insert(&mut self, index: usize, item: T) {
        self.items.insert(index, item);
        self.relink_from(index);
    }

    pub(crate) fn replace(&mut self, index: usize, mut item: T) -> T {
        item.attach(index);
        let mut old = std::mem::replace(&mut self.items[index], item);
        old.detach();
        old
    }

    pub(crate) fn remove(&mut self, index: usize) -> T {
        let mut old = self.items.remove(index);
        old.detach();
        self.relink_from(index);
        old
    }

    pub(crate) fn drain(&mut self, range: Range<usize>) -> Vec<T> {
        let start = range.start;
        let mut out: Vec<T> = self.items.drain(range).collect();
        out.iter_mut().for_each(Linked::detach);
        self.relink_from(start);
        out
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        let mut last = self.items.pop()?;
        last.detach();
        Some(last)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<ChildMut<'_, T>> {
        self.items
            .get_mut(index)
            .map(|item| ChildMut { item, position: index })
    }

    pub(crate) fn reverse(&mut self) {
        self.items.reverse();
        self.relink_from(0);
    }

    pub(crate) fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(compare);
        self.relink_from(0);
    }

    fn relink_from(&mut self, start: usize) {
        for (position, item) in self.items.iter_mut().enumerate().skip(start) {
            item.attach(position);
        }
    }
}

impl<T: Tagged + Clone> Clone for Children<T> {
    fn clone(&self) -> Self {
        let mut out = Children {
            items: self.items.clone(),
        };
        out.relink_from(0);
        out
    }
}

/// Mutable access to a child that restores its parent link when dropped.
pub struct ChildMut<'a, T: Tagged> {
    item: &'a mut T,
    position: usize,
}

impl<T: Tagged> Deref for ChildMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.item
    }
}

impl<T: Tagged> DerefMut for ChildMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item
    }
}

impl<T: Tagged> Drop for ChildMut<'_, T> {
    fn drop(&mut self) {
        self.item.attach(self.position);
    }
}

/// Identifies one child: by position or by (first matching) tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key<'a> {
    Index(usize),
    Tag(&'a str),
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(tag: &'a str) -> Self {
        Key::Tag(tag)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(tag: &'a String) -> Self {
        Key::Tag(tag)
    }
}

/// Something a child can be matched against: a tag, or a node compared
/// structurally.
pub trait Probe<T> {
    fn matches(&self, candidate: &T) -> bool;
}

impl<T: Tagged> Probe<T> for str {
    fn matches(&self, candidate: &T) -> bool {
        candidate.tag() == self
    }
}

impl<T: Tagged> Probe<T> for String {
    fn matches(&self, candidate: &T) -> bool {
        candidate.tag() == self
    }
}

/// Converts any range over a list of length `len` into a checked `Range`.
pub(crate) fn bounds<R: RangeBounds<usize>>(range: &R, len: usize) -> Result<Range<usize>> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    if end > len {
        return Err(Error::out_of_range(end, len));
    }
    if start > end {
        return Err(Error::out_of_range(start, len));
    }
    Ok(start..end)
}

/// Ordered, duplicate-friendly list operations on a node's children.
pub trait Container: Tagged + Clone {
    type Child: Tagged + Clone + PartialEq;

    fn children(&self) -> &Children<Self::Child>;

    #[doc(hidden)]
    fn children_mut(&mut self) -> &mut Children<Self::Child>;

    /// Number of direct children.
    fn len(&self) -> usize {
        self.children().len()
    }

    fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    fn iter(&self) -> std::slice::Iter<'_, Self::Child> {
        self.children().iter()
    }

    /// Tags of the direct children, in order.
    fn tags(&self) -> Vec<&str> {
        self.iter().map(Tagged::tag).collect()
    }

    /// Resolves a key to a position.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] for a bad index, [`Error::KeyNotFound`] for an
    /// unknown tag.
    fn locate<'k>(&self, key: impl Into<Key<'k>>) -> Result<usize> {
        match key.into() {
            Key::Index(index) if index < self.len() => Ok(index),
            Key::Index(index) => Err(Error::out_of_range(index, self.len())),
            Key::Tag(tag) => self
                .iter()
                .position(|child| child.tag() == tag)
                .ok_or_else(|| Error::key_not_found(tag)),
        }
    }

    /// Returns the child at an index, or the first child with a tag.
    ///
    /// # Errors
    ///
    /// See [`Container::locate`].
    fn get<'k>(&self, key: impl Into<Key<'k>>) -> Result<&Self::Child> {
        let index = self.locate(key)?;
        Ok(&self.children()[index])
    }

    /// Mutable access to the child at an index or with a tag.
    ///
    /// # Errors
    ///
    /// See [`Container::locate`].
    fn get_mut<'k>(&mut self, key: impl Into<Key<'k>>) -> Result<ChildMut<'_, Self::Child>> {
        let index = self.locate(key)?;
        let len = self.len();
        self.children_mut()
            .get_mut(index)
            .ok_or_else(|| Error::out_of_range(index, len))
    }

    /// Every child carrying `tag`, in order.
    fn get_all(&self, tag: &str) -> Vec<&Self::Child> {
        self.iter().filter(|child| child.tag() == tag).collect()
    }

    /// Positional sub-slice.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the range exceeds the list.
    fn slice<R: RangeBounds<usize>>(&self, range: R) -> Result<&[Self::Child]> {
        let range = bounds(&range, self.len())?;
        Ok(&self.children()[range])
    }

    /// Position of the first child matched by `probe`.
    fn index_of<P: Probe<Self::Child> + ?Sized>(&self, probe: &P) -> Option<usize> {
        self.iter().position(|child| probe.matches(child))
    }

    /// Tag-or-value membership over direct children.
    fn contains<P: Probe<Self::Child> + ?Sized>(&self, probe: &P) -> bool {
        self.index_of(probe).is_some()
    }

    /// Number of children carrying `tag`.
    fn count(&self, tag: &str) -> usize {
        self.iter().filter(|child| child.tag() == tag).count()
    }

    /// Appends a child at the end and links it to this container.
    fn append<C: Into<Self::Child>>(&mut self, child: C) {
        self.children_mut().push(child.into());
    }

    /// Inserts a child at `index`, shifting later children right.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `index > len`.
    fn insert<C: Into<Self::Child>>(&mut self, index: usize, child: C) -> Result<()> {
        if index > self.len() {
            return Err(Error::out_of_range(index, self.len()));
        }
        self.children_mut().insert(index, child.into());
        Ok(())
    }

    fn extend<I>(&mut self, children: I)
    where
        I: IntoIterator,
        I::Item: Into<Self::Child>,
    {
        for child in children {
            self.append(child);
        }
    }

    /// Replaces the resolved child and returns the old one, unlinked.
    ///
    /// # Errors
    ///
    /// See [`Container::locate`].
    fn set<'k, C: Into<Self::Child>>(
        &mut self,
        key: impl Into<Key<'k>>,
        child: C,
    ) -> Result<Self::Child> {
        let index = self.locate(key)?;
        Ok(self.children_mut().replace(index, child.into()))
    }

    /// Removes the resolved child and returns it, unlinked.
    ///
    /// # Errors
    ///
    /// See [`Container::locate`].
    fn delete<'k>(&mut self, key: impl Into<Key<'k>>) -> Result<Self::Child> {
        let index = self.locate(key)?;
        Ok(self.children_mut().remove(index))
    }

    /// Removes a positional range of children.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the range exceeds the list.
    fn delete_range<R: RangeBounds<usize>>(&mut self, range: R) -> Result<Vec<Self::Child>> {
        let range = bounds(&range, self.len())?;
        Ok(self.children_mut().drain(range))
    }

    /// Removes the first child structurally equal to `child`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if no child matches.
    fn remove(&mut self, child: &Self::Child) -> Result<Self::Child> {
        let index = self
            .iter()
            .position(|candidate| candidate == child)
            .ok_or_else(|| Error::key_not_found(child.tag()))?;
        Ok(self.children_mut().remove(index))
    }

    fn pop(&mut self) -> Option<Self::Child> {
        self.children_mut().pop()
    }

    /// Appends a copy of every element of `other` (`+=`).
    fn combine(&mut self, other: &Self) {
        for child in other.iter() {
            self.children_mut().push(child.clone());
        }
    }

    /// Returns a copy of `self` with the elements of `other` appended (`+`).
    #[must_use]
    fn combined(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.combine(other);
        out
    }

    /// Removes the first structural match of each element of `other` (`-=`).
    /// Elements with no match are skipped.
    fn subtract(&mut self, other: &Self) {
        for child in other.iter() {
            if let Some(index) = self.iter().position(|candidate| candidate == child) {
                self.children_mut().remove(index);
            }
        }
    }

    /// Non-mutating form of [`Container::subtract`] (`-`).
    #[must_use]
    fn subtracted(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.subtract(other);
        out
    }

    /// Tag-only lexicographic comparison.
    fn compare(&self, other: &Self) -> Ordering {
        self.tag().cmp(other.tag())
    }

    fn reverse(&mut self) {
        self.children_mut().reverse();
    }

    /// Stable sort of the children by tag.
    fn sort_by_tag(&mut self, ignore_case: bool) {
        if ignore_case {
            self.children_mut()
                .sort_by(|a, b| a.tag().to_lowercase().cmp(&b.tag().to_lowercase()));
        } else {
            self.children_mut().sort_by(|a, b| a.tag().cmp(b.tag()));
        }
    }
}

/// Operator forms of the container contract:
/// `+`/`+=` with a container or a child, `-`/`-=` with a container or a child.
macro_rules! impl_container_ops {
    ($container:ty, $child:ty) => {
        impl std::ops::AddAssign<&$container> for $container {
            fn add_assign(&mut self, other: &$container) {
                $crate::Container::combine(self, other);
            }
        }

        impl std::ops::AddAssign<$container> for $container {
            fn add_assign(&mut self, other: $container) {
                $crate::Container::combine(self, &other);
            }
        }

        impl std::ops::AddAssign<$child> for $container {
            fn add_assign(&mut self, child: $child) {
                $crate::Container::append(self, child);
            }
        }

        impl std::ops::Add<&$container> for $container {
            type Output = $container;

            fn add(mut self, other: &$container) -> $container {
                self += other;
                self
            }
        }

        impl std::ops::Add<$container> for $container {
            type Output = $container;

            fn add(mut self, other: $container) -> $container {
                self += &other;
                self
            }
        }

        impl std::ops::Add<$child> for $container {
            type Output = $container;

            fn add(mut self, child: $child) -> $container {
                self += child;
                self
            }
        }

        impl std::ops::SubAssign<&$container> for $container {
            fn sub_assign(&mut self, other: &$container) {
                $crate::Container::subtract(self, other);
            }
        }

        impl std::ops::SubAssign<&$child> for $container {
            fn sub_assign(&mut self, child: &$child) {
                let _ = $crate::Container::remove(self, child);
            }
        }

        impl std::ops::Sub<&$container> for $container {
            type Output = $container;

            fn sub(mut self, other: &$container) -> $container {
                self -= other;
                self
            }
        }

        impl std::ops::Sub<&$child> for $container {
            type Output = $container;

            fn sub(mut self, child: &$child) -> $container {
                self -= child;
                self
            }
        }
    };
}

pub(crate) use impl_container_ops;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Property, Qoid};

    fn sample() -> Qoid {
        let mut qoid = Qoid::new("sample");
        qoid.append(Property::new("a", "1"));
        qoid.append(Property::new("b", "2"));
        qoid.append(Property::new("a", "3"));
        qoid
    }

    #[test]
    fn test_bounds() {
        assert_eq!(bounds(&(..), 3).unwrap(), 0..3);
        assert_eq!(bounds(&(1..=2), 3).unwrap(), 1..3);
        assert!(matches!(
            bounds(&(0..4), 3),
            Err(Error::OutOfRange { index: 4, len: 3 })
        ));
        assert!(bounds(&(2..1), 3).is_err());
    }

    #[test]
    fn test_links_follow_positions() {
        let mut qoid = sample();
        assert_eq!(qoid.get(2).unwrap().position(), Some(2));

        let removed = qoid.delete(0).unwrap();
        assert!(!removed.has_parent());
        assert_eq!(qoid.get(0).unwrap().position(), Some(0));
        assert_eq!(qoid.get(1).unwrap().position(), Some(1));

        qoid.insert(0, removed).unwrap();
        let positions: Vec<_> = qoid.iter().map(|p| p.position()).collect();
        assert_eq!(positions, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_tag_key_uses_first_match() {
        let mut qoid = sample();
        let old = qoid.set("a", Property::new("a", "9")).unwrap();
        assert_eq!(old.value(), "1");
        assert!(!old.has_parent());
        assert_eq!(qoid.all_of("a"), vec!["9", "3"]);

        let deleted = qoid.delete("a").unwrap();
        assert_eq!(deleted.value(), "9");
        assert_eq!(qoid.all_of("a"), vec!["3"]);
    }

    #[test]
    fn test_missing_keys() {
        let mut qoid = sample();
        assert!(matches!(qoid.get("zzz"), Err(Error::KeyNotFound(t)) if t == "zzz"));
        assert!(matches!(qoid.delete(10), Err(Error::OutOfRange { index: 10, len: 3 })));
        assert!(qoid.set(3, Property::new("x", "y")).is_err());
        assert!(qoid.insert(4, Property::new("x", "y")).is_err());
    }

    #[test]
    fn test_get_mut_restores_link() {
        let mut qoid = sample();
        {
            let mut b = qoid.get_mut("b").unwrap();
            b.set_value("20");
        }
        let b = qoid.get(1).unwrap();
        assert_eq!(b.value(), "20");
        assert_eq!(b.position(), Some(1));
    }

    #[test]
    fn test_slices_and_ranges() {
        let mut qoid = sample();
        assert_eq!(qoid.slice(1..).unwrap().len(), 2);
        assert!(qoid.slice(..5).is_err());

        let drained = qoid.delete_range(..2).unwrap();
        assert_eq!(drained.len(), 2);
        assert!(drained.iter().all(|p| !p.has_parent()));
        assert_eq!(qoid.get(0).unwrap().position(), Some(0));
    }

    #[test]
    fn test_contains_tag_or_value() {
        let qoid = sample();
        assert!(qoid.contains("b"));
        assert!(qoid.contains(&"b".to_string()));
        assert!(qoid.contains(&Property::new("b", "2")));
        assert!(!qoid.contains(&Property::new("b", "3")));
        assert!(!qoid.contains("2"));
    }

    #[test]
    fn test_sort_and_reverse() {
        let mut qoid = Qoid::new("s");
        qoid.append(Property::new("b", "1"));
        qoid.append(Property::new("A", "2"));
        qoid.append(Property::new("a", "3"));

        qoid.sort_by_tag(true);
        assert_eq!(qoid.tags(), vec!["A", "a", "b"]);

        qoid.sort_by_tag(false);
        assert_eq!(qoid.tags(), vec!["A", "a", "b"]);

        qoid.reverse();
        assert_eq!(qoid.tags(), vec!["b", "a", "A"]);
        assert_eq!(qoid.get(0).unwrap().position(), Some(0));
    }

    #[test]
    fn test_clone_relinks_children_and_detaches_root() {
        let mut outer = crate::Collection::new("outer");
        outer.append(sample());
        let copy = outer.get(0).unwrap().clone();
        assert!(!copy.has_parent());
        assert_eq!(copy.get(2).unwrap().position(), Some(2));
    }

    #[test]
    fn test_count_and_pop() {
        let mut qoid = sample();
        assert_eq!(qoid.count("a"), 2);
        let last = qoid.pop().unwrap();
        assert_eq!(last.value(), "3");
        assert!(!last.has_parent());
        assert_eq!(qoid.count("a"), 1);
    }
}
