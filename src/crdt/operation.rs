//! Operations exchanged between replicas.
//!
//! Operations address elements by Identifier, never by position, so they can be
//! replayed on any replica that already knows the anchor.

use serde::{Deserialize, Serialize};

use crate::crdt::types::Identifier;

/// An immutable description of one mutation, ready to broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Insert `value` as a new element `id` anchored after `after`.
    Insert {
        id: Identifier,
        after: Identifier,
        value: char,
    },
    /// Tombstone the element `id`.
    Delete { id: Identifier },
}

impl Operation {
    /// The element created (Insert) or targeted (Delete).
    pub fn id(&self) -> &Identifier {
        match self {
            Operation::Insert { id, .. } | Operation::Delete { id } => id,
        }
    }

    /// The anchor an Insert depends on.
    pub fn anchor(&self) -> Option<&Identifier> {
        match self {
            Operation::Insert { after, .. } => Some(after),
            Operation::Delete { .. } => None,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Operation::Insert { .. })
    }
}
