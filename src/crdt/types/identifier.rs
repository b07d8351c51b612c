//! Identifier implementation for RGA elements.
//!
//! This module contains the Identifier struct which serves as a globally unique
//! name for each insertion event, providing both identity and ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crdt::types::site::SiteId;

/// A unique identifier for each character/element in the RGA.
///
/// Identifiers are ordered first by counter, then by site id (lexicographic).
/// Among elements inserted after the same anchor, the greater identifier ends
/// up earlier in the document, so this order is what resolves concurrent
/// inserts.
///
/// Field order matters: the derived `Ord` compares `counter` before `site`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identifier {
    counter: u64,
    site: SiteId,
}

impl Identifier {
    /// The synthetic root of every document. Never tombstoned, sorts first.
    pub const HEAD: Identifier = Identifier {
        counter: 0,
        site: SiteId::HEAD,
    };

    pub fn new(counter: u64, site: SiteId) -> Self {
        Identifier { counter, site }
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn site(&self) -> &SiteId {
        &self.site
    }

    pub fn is_head(&self) -> bool {
        *self == Identifier::HEAD
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.counter, self.site)
    }
}
