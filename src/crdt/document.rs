//! Core RGA sequence implementation.
//!
//! This module contains the Document struct, the ordered collection of
//! elements behind every replica, and the insertion algorithm that places
//! concurrent inserts deterministically.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::crdt::element::Element;
use crate::crdt::types::Identifier;
use crate::error::{Error, Result};

/// What a mutation did to the document.
///
/// Duplicate inserts and repeated deletes are legal and simply leave the
/// document as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The document was mutated.
    Changed,
    /// The call was a no-op.
    Unchanged,
}

impl Outcome {
    pub fn is_changed(self) -> bool {
        self == Outcome::Changed
    }
}

impl From<bool> for Outcome {
    fn from(changed: bool) -> Self {
        if changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    element: Element,
    next: Option<usize>,
}

/// The Replicated Growable Array sequence.
///
/// # Design
///
/// - Elements live in an append-only arena; slot 0 is always HEAD
/// - Sequence order is a singly linked chain of arena indices starting at HEAD
/// - An id-to-slot map serves lookups by Identifier
/// - Tombstones stay in place forever so late inserts can still anchor on them
///
/// The sequence is a preorder walk of the anchor tree (each element hangs
/// under the element it was inserted after) with siblings sorted by
/// ascending Identifier. A subtree is therefore the run of following elements
/// that sit deeper than its root.
///
/// Cloning yields a fully independent copy; nothing is shared between the two.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    index: FxHashMap<Identifier, usize>,
    tail: usize,
    visible: usize,
}

impl Document {
    /// Creates an empty document holding only HEAD.
    pub fn new() -> Self {
        let mut index = FxHashMap::default();
        index.insert(Identifier::HEAD, 0);

        Document {
            slots: vec![Slot {
                element: Element::head(),
                next: None,
            }],
            index,
            tail: 0,
            visible: 0,
        }
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.index.contains_key(id)
    }

    /// Looks up an element, tombstoned or not.
    pub fn find_by_id(&self, id: &Identifier) -> Option<&Element> {
        self.index.get(id).map(|&slot| &self.slots[slot].element)
    }

    /// Id of the physically last element, tombstoned or not.
    ///
    /// Handy for appending while typing on a single replica. Two replicas can
    /// disagree on it after a merge, so it must not be used to coordinate
    /// between them.
    pub fn last_id(&self) -> Identifier {
        self.slots[self.tail].element.id().clone()
    }

    /// Inserts `value` under `id` as a child of the element `after`.
    ///
    /// Starting right after the anchor, children of the anchor whose id is
    /// smaller than `id` are skipped along with their subtrees. The new
    /// element lands before the first greater child, or after the last child
    /// subtree. Replicas applying the same set of inserts in any causal order
    /// therefore end up with the same sequence.
    ///
    /// # Returns
    ///
    /// * `Ok(Outcome::Changed)` - The element was inserted
    /// * `Ok(Outcome::Unchanged)` - An element with `id` already exists
    /// * `Err(Error::AnchorNotFound)` - `after` is not in this document
    pub fn insert_after(&mut self, after: &Identifier, id: Identifier, value: char) -> Result<Outcome> {
        if self.index.contains_key(&id) {
            return Ok(Outcome::Unchanged);
        }
        let Some(&anchor) = self.index.get(after) else {
            return Err(Error::AnchorNotFound {
                id,
                after: after.clone(),
            });
        };

        let child_depth = self.slots[anchor].element.depth() + 1;
        let mut prev = anchor;
        let mut cursor = self.slots[anchor].next;

        while let Some(slot) = cursor {
            let sibling = &self.slots[slot].element;
            if sibling.depth() != child_depth || *sibling.id() > id {
                break;
            }
            // Skip the smaller sibling and everything anchored below it
            prev = slot;
            cursor = self.slots[slot].next;
            while let Some(inner) = cursor {
                if self.slots[inner].element.depth() <= child_depth {
                    break;
                }
                prev = inner;
                cursor = self.slots[inner].next;
            }
        }

        let element = Element::new(id.clone(), value, &self.slots[anchor].element);
        let next = self.slots[prev].next;
        let new_slot = self.slots.len();
        self.slots.push(Slot { element, next });
        self.slots[prev].next = Some(new_slot);
        if prev == self.tail {
            self.tail = new_slot;
        }
        self.index.insert(id, new_slot);
        self.visible += 1;

        Ok(Outcome::Changed)
    }

    /// Marks the element as deleted.
    ///
    /// Unknown ids, already-tombstoned elements and HEAD are silently ignored.
    pub fn tombstone(&mut self, id: &Identifier) -> Outcome {
        let Some(&slot) = self.index.get(id) else {
            return Outcome::Unchanged;
        };
        let changed = self.slots[slot].element.tombstone();
        if changed {
            self.visible -= 1;
        }
        Outcome::from(changed)
    }

    /// Returns the current visible content as a String.
    pub fn text(&self) -> String {
        self.visible_elements().filter_map(Element::value).collect()
    }

    /// Iterates over every element in sequence order, HEAD and tombstones included.
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            document: self,
            cursor: Some(0),
        }
    }

    /// Iterates over the elements that make up the text.
    pub fn visible_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements().filter(|element| element.is_visible())
    }

    /// Id of the element at a visible (text) position.
    pub fn id_at(&self, position: usize) -> Option<Identifier> {
        self.visible_elements()
            .nth(position)
            .map(|element| element.id().clone())
    }

    /// Number of visible characters.
    pub fn len(&self) -> usize {
        self.visible
    }

    pub fn is_empty(&self) -> bool {
        self.visible == 0
    }

    /// Number of elements including HEAD and tombstones.
    pub fn total_len(&self) -> usize {
        self.slots.len()
    }

    /// Logs every element, tombstones and HEAD included, at debug level.
    pub fn dump(&self) {
        debug!(
            elements = self.total_len(),
            visible = self.len(),
            "document dump"
        );
        for element in self.elements() {
            let status = if element.is_head() {
                "HEAD"
            } else if element.is_tombstoned() {
                "DELETED"
            } else {
                "ACTIVE"
            };
            debug!(
                id = %element.id(),
                value = ?element.value(),
                after = ?element.after().map(ToString::to_string),
                status,
                "element"
            );
        }
        debug!(text = %self, "document content");
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self.visible_elements().filter_map(Element::value) {
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// Iterator over a document's elements in sequence order.
pub struct Elements<'a> {
    document: &'a Document,
    cursor: Option<usize>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let document = self.document;
        let slot = &document.slots[self.cursor?];
        self.cursor = slot.next;
        Some(&slot.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crdt::types::SiteId;

    fn id(counter: u64, site: &str) -> Identifier {
        Identifier::new(counter, SiteId::new(site).unwrap())
    }

    #[test]
    fn test_document_creation() {
        let doc = Document::new();
        assert_eq!(doc.text(), "");
        assert_eq!(doc.len(), 0);
        assert!(doc.is_empty());
        assert_eq!(doc.total_len(), 1); // HEAD only
        assert_eq!(doc.last_id(), Identifier::HEAD);
        assert!(doc.find_by_id(&Identifier::HEAD).unwrap().is_head());
    }

    #[test]
    fn test_sequential_insertion() {
        let mut doc = Document::new();
        let mut last = Identifier::HEAD;

        for (i, ch) in "Hello".chars().enumerate() {
            let next = id(i as u64 + 1, "a");
            doc.insert_after(&last, next.clone(), ch).unwrap();
            last = next;
        }

        assert_eq!(doc.text(), "Hello");
        assert_eq!(doc.to_string(), "Hello");
        assert_eq!(doc.last_id(), id(5, "a"));
    }

    #[test]
    fn test_smaller_sibling_comes_first() {
        let mut doc = Document::new();
        doc.insert_after(&Identifier::HEAD, id(2, "a"), 'b').unwrap();
        doc.insert_after(&Identifier::HEAD, id(1, "b"), 'c').unwrap();
        doc.insert_after(&Identifier::HEAD, id(1, "a"), 'a').unwrap();

        // 1@a < 1@b < 2@a
        assert_eq!(doc.text(), "acb");
    }

    #[test]
    fn test_sibling_subtree_is_skipped_whole() {
        // HEAD <- 1@b <- 9@c, then a concurrent 3@a under HEAD.
        // 3@a is greater than 1@b, so it goes after 1@b's whole subtree even
        // though 9@c is greater than 3@a.
        let mut doc = Document::new();
        doc.insert_after(&Identifier::HEAD, id(1, "b"), 'B').unwrap();
        doc.insert_after(&id(1, "b"), id(9, "c"), 'C').unwrap();
        doc.insert_after(&Identifier::HEAD, id(3, "a"), 'A').unwrap();
        assert_eq!(doc.text(), "BCA");

        // Same operations, other delivery order
        let mut other = Document::new();
        other.insert_after(&Identifier::HEAD, id(1, "b"), 'B').unwrap();
        other.insert_after(&Identifier::HEAD, id(3, "a"), 'A').unwrap();
        other.insert_after(&id(1, "b"), id(9, "c"), 'C').unwrap();
        assert_eq!(other.text(), "BCA");
    }

    #[test]
    fn test_later_child_goes_after_earlier_child() {
        let mut doc = Document::new();
        doc.insert_after(&Identifier::HEAD, id(1, "a"), 'a').unwrap();
        doc.insert_after(&id(1, "a"), id(2, "a"), 'b').unwrap();
        doc.insert_after(&id(2, "a"), id(3, "a"), 'c').unwrap();
        doc.insert_after(&id(1, "a"), id(4, "a"), 'd').unwrap();

        assert_eq!(doc.text(), "abcd");
        assert_eq!(doc.last_id(), id(4, "a"));
    }

    #[test]
    fn test_insert_before_greater_sibling_keeps_tail() {
        let mut doc = Document::new();
        doc.insert_after(&Identifier::HEAD, id(2, "a"), 'b').unwrap();
        doc.insert_after(&Identifier::HEAD, id(1, "a"), 'a').unwrap();

        assert_eq!(doc.text(), "ab");
        assert_eq!(doc.last_id(), id(2, "a"));
    }

    #[test]
    fn test_missing_anchor() {
        let mut doc = Document::new();
        let result = doc.insert_after(&id(9, "x"), id(1, "a"), 'a');

        assert_eq!(
            result,
            Err(Error::AnchorNotFound {
                id: id(1, "a"),
                after: id(9, "x"),
            })
        );
        assert_eq!(doc.total_len(), 1);
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut doc = Document::new();
        let first = doc.insert_after(&Identifier::HEAD, id(1, "a"), 'X').unwrap();
        let second = doc.insert_after(&Identifier::HEAD, id(1, "a"), 'X').unwrap();

        assert_eq!(first, Outcome::Changed);
        assert_eq!(second, Outcome::Unchanged);
        assert_eq!(doc.text(), "X");
        assert_eq!(doc.total_len(), 2);
    }

    #[test]
    fn test_tombstone() {
        let mut doc = Document::new();
        doc.insert_after(&Identifier::HEAD, id(1, "a"), 'A').unwrap();

        assert_eq!(doc.tombstone(&id(1, "a")), Outcome::Changed);
        assert_eq!(doc.text(), "");
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.total_len(), 2); // Still has the tombstone

        assert_eq!(doc.tombstone(&id(1, "a")), Outcome::Unchanged);
        assert_eq!(doc.tombstone(&id(7, "zz")), Outcome::Unchanged);
        assert_eq!(doc.tombstone(&Identifier::HEAD), Outcome::Unchanged);
    }

    #[test]
    fn test_last_id_includes_tombstones() {
        let mut doc = Document::new();
        doc.insert_after(&Identifier::HEAD, id(1, "a"), 'A').unwrap();
        doc.tombstone(&id(1, "a"));

        assert_eq!(doc.last_id(), id(1, "a"));
    }

    #[test]
    fn test_id_at_skips_tombstones() {
        let mut doc = Document::new();
        doc.insert_after(&Identifier::HEAD, id(1, "a"), 'a').unwrap();
        doc.insert_after(&id(1, "a"), id(2, "a"), 'b').unwrap();
        doc.insert_after(&id(2, "a"), id(3, "a"), 'c').unwrap();
        doc.tombstone(&id(2, "a"));

        assert_eq!(doc.id_at(0), Some(id(1, "a")));
        assert_eq!(doc.id_at(1), Some(id(3, "a")));
        assert_eq!(doc.id_at(2), None);
    }

    #[test]
    fn test_elements_order_and_clone_independence() {
        let mut doc = Document::new();
        doc.insert_after(&Identifier::HEAD, id(1, "a"), 'a').unwrap();
        doc.insert_after(&id(1, "a"), id(2, "a"), 'b').unwrap();
        doc.tombstone(&id(1, "a"));

        let mut copy = doc.clone();
        let ids: Vec<_> = copy.elements().map(|e| e.id().clone()).collect();
        assert_eq!(ids, vec![Identifier::HEAD, id(1, "a"), id(2, "a")]);
        assert!(copy.find_by_id(&id(1, "a")).unwrap().is_tombstoned());

        copy.insert_after(&id(2, "a"), id(1, "b"), 'c').unwrap();
        assert_eq!(copy.text(), "bc");
        assert_eq!(doc.text(), "b");
        assert!(!doc.contains(&id(1, "b")));
    }
}
