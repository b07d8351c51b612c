//! Error type shared by every fallible operation in the crate.
//!
//! Only genuine precondition violations show up here. Duplicate inserts and
//! deletes of unknown or already-deleted elements are absorbed by the CRDT and
//! reported as [`Outcome::Unchanged`](crate::Outcome) instead.

use thiserror::Error;

use crate::crdt::types::{Identifier, SiteId};

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can happen while generating or applying operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An Insert referenced an anchor that this document has never seen.
    ///
    /// Locally this means the caller passed an id from somewhere else; for a
    /// remote operation it means causal delivery was violated.
    #[error("cannot insert {id}: anchor {after} not found")]
    AnchorNotFound { id: Identifier, after: Identifier },

    /// Site identifiers must be non-empty.
    #[error("site identifier must not be empty")]
    EmptySiteId,

    /// A fork was asked to reuse a site that already minted identifiers in
    /// this document's lineage.
    #[error("site {site} is already in use")]
    SiteInUse { site: SiteId },

    /// The site has used up every counter value.
    #[error("counter exhausted for site {site}")]
    CounterExhausted { site: SiteId },
}
