//! Element definition for the RGA CRDT.
//!
//! This module contains the Element struct which represents a single
//! character in the document, or the HEAD sentinel that roots every document.

use crate::crdt::types::Identifier;

/// Represents a single character within the RGA.
///
/// Each element contains:
/// - A unique identifier naming the insert event that created it
/// - The character content (absent for HEAD)
/// - A tombstone flag for logical deletion
/// - The anchor it was inserted after, and its depth below HEAD
///
/// # Tombstone Deletion
///
/// Elements are never physically removed. Deleting an element flips
/// `tombstoned` to true, which hides it from the text while keeping it in
/// place as an anchor for inserts that have not arrived yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: Identifier,
    value: Option<char>,
    tombstoned: bool,
    after: Option<Identifier>,
    depth: usize,
}

impl Element {
    /// The HEAD sentinel element.
    pub(crate) fn head() -> Self {
        Element {
            id: Identifier::HEAD,
            value: None,
            tombstoned: false,
            after: None,
            depth: 0,
        }
    }

    /// Creates a live element inserted after `anchor`.
    pub(crate) fn new(id: Identifier, value: char, anchor: &Element) -> Self {
        Element {
            id,
            value: Some(value),
            tombstoned: false,
            after: Some(anchor.id.clone()),
            depth: anchor.depth + 1,
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The character content; `None` only for HEAD.
    pub fn value(&self) -> Option<char> {
        self.value
    }

    /// The anchor this element was inserted after; `None` only for HEAD.
    pub fn after(&self) -> Option<&Identifier> {
        self.after.as_ref()
    }

    /// Distance from HEAD in the anchor tree.
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_head(&self) -> bool {
        self.value.is_none()
    }

    pub fn is_tombstoned(&self) -> bool {
        self.tombstoned
    }

    /// Returns true if this element contributes to the text.
    pub fn is_visible(&self) -> bool {
        !self.tombstoned && !self.is_head()
    }

    /// Marks this element as deleted. HEAD is never tombstoned.
    ///
    /// Returns true if the flag flipped.
    pub(crate) fn tombstone(&mut self) -> bool {
        if self.is_head() || self.tombstoned {
            return false;
        }
        self.tombstoned = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crdt::types::SiteId;

    fn id(counter: u64) -> Identifier {
        Identifier::new(counter, SiteId::new("r1").unwrap())
    }

    #[test]
    fn test_element_creation() {
        let head = Element::head();
        let element = Element::new(id(1), 'A', &head);

        assert_eq!(element.id(), &id(1));
        assert_eq!(element.value(), Some('A'));
        assert_eq!(element.after(), Some(&Identifier::HEAD));
        assert_eq!(element.depth(), 1);
        assert!(!element.is_tombstoned());
        assert!(element.is_visible());
    }

    #[test]
    fn test_element_tombstone_is_one_way() {
        let head = Element::head();
        let mut element = Element::new(id(1), 'A', &head);

        assert!(element.tombstone());
        assert!(element.is_tombstoned());
        assert!(!element.is_visible());

        // Second tombstone is a no-op
        assert!(!element.tombstone());
        assert!(element.is_tombstoned());
    }

    #[test]
    fn test_head_is_never_tombstoned() {
        let mut head = Element::head();

        assert!(head.is_head());
        assert!(!head.is_visible());
        assert!(!head.tombstone());
        assert!(!head.is_tombstoned());
        assert_eq!(head.after(), None);
    }

    #[test]
    fn test_depth_follows_anchor_chain() {
        let head = Element::head();
        let a = Element::new(id(1), 'a', &head);
        let b = Element::new(id(2), 'b', &a);
        let c = Element::new(id(3), 'c', &b);

        assert_eq!(c.depth(), 3);
        assert_eq!(c.after(), Some(&id(2)));
    }
}
