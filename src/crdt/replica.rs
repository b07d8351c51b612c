//! Replica: one participant's view of the shared document.
//!
//! A replica owns a site clock and a document. Local edits mint identifiers,
//! mutate the document right away and hand back the operation to broadcast;
//! remote operations go through `apply`.

use tracing::{debug, info, trace, warn};

use crate::crdt::document::{Document, Outcome};
use crate::crdt::operation::Operation;
use crate::crdt::types::{Identifier, SiteClock, SiteId};
use crate::error::{Error, Result};

/// A single-threaded collaborator on one document.
///
/// All calls run to completion synchronously. Replicas share nothing; the only
/// way state moves between them is by passing `Operation`s to `apply`.
#[derive(Debug)]
pub struct Replica {
    clock: SiteClock,
    document: Document,
}

impl Replica {
    /// Creates a replica with an empty document and counter 0.
    pub fn new(site: SiteId) -> Self {
        Replica {
            clock: SiteClock::new(site),
            document: Document::new(),
        }
    }

    pub fn site(&self) -> &SiteId {
        self.clock.site()
    }

    /// The last counter value this replica minted.
    pub fn counter(&self) -> u64 {
        self.clock.current()
    }

    /// Read-only view of the document. Mutations go through the replica.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Inserts `value` after the element `after` and returns the operation to broadcast.
    ///
    /// `after` must already be in this replica's document (HEAD always is).
    /// On failure nothing changes and no counter value is used up.
    pub fn insert(&mut self, after: &Identifier, value: char) -> Result<Operation> {
        if !self.document.contains(after) {
            return Err(Error::AnchorNotFound {
                id: self.clock.peek(),
                after: after.clone(),
            });
        }

        let id = self.clock.tick()?;
        self.document.insert_after(after, id.clone(), value)?;
        debug!(site = %self.site(), %id, %after, ?value, "local insert");

        Ok(Operation::Insert {
            id,
            after: after.clone(),
            value,
        })
    }

    /// Types `text` after `after`, each character anchored on the previous one.
    pub fn insert_str(&mut self, after: &Identifier, text: &str) -> Result<Vec<Operation>> {
        let mut anchor = after.clone();
        let mut ops = Vec::with_capacity(text.chars().count());
        for value in text.chars() {
            let op = self.insert(&anchor, value)?;
            anchor = op.id().clone();
            ops.push(op);
        }
        Ok(ops)
    }

    /// Deletes the element `id` and returns the operation to broadcast.
    ///
    /// Deleting an unknown or already-deleted element is not an error.
    pub fn delete(&mut self, id: &Identifier) -> Operation {
        let outcome = self.document.tombstone(id);
        debug!(site = %self.site(), %id, changed = outcome.is_changed(), "local delete");
        Operation::Delete { id: id.clone() }
    }

    /// Applies an operation received from another replica (or replayed locally).
    ///
    /// Duplicate inserts and deletes of unknown or deleted elements return
    /// `Outcome::Unchanged`. An Insert whose anchor has not arrived yet is
    /// rejected with `Error::AnchorNotFound` and leaves the document untouched;
    /// buffering it is up to the caller (see `Inbox`).
    pub fn apply(&mut self, op: &Operation) -> Result<Outcome> {
        let outcome = match op {
            Operation::Insert { id, after, value } => {
                match self.document.insert_after(after, id.clone(), *value) {
                    Err(err) => {
                        warn!(site = %self.site(), %id, %after, "insert arrived before its anchor");
                        return Err(err);
                    }
                    Ok(outcome) => outcome,
                }
            }
            Operation::Delete { id } => self.document.tombstone(id),
        };

        if outcome.is_changed() {
            debug!(site = %self.site(), id = %op.id(), insert = op.is_insert(), "applied remote operation");
        } else {
            trace!(site = %self.site(), id = %op.id(), insert = op.is_insert(), "remote operation was a no-op");
        }
        Ok(outcome)
    }

    /// Creates an independent replica for `site` holding a copy of this document.
    ///
    /// The copy keeps text, order and tombstones; its counter starts at 0.
    /// `site` must not be this replica's own site, nor any site that already
    /// minted identifiers found in the document.
    pub fn fork(&self, site: SiteId) -> Result<Replica> {
        let in_use = site == *self.site()
            || self
                .document
                .elements()
                .any(|element| *element.id().site() == site);
        if in_use {
            return Err(Error::SiteInUse { site });
        }

        info!(from = %self.site(), to = %site, elements = self.document.total_len(), "forking replica");
        Ok(Replica {
            clock: SiteClock::new(site),
            document: self.document.clone(),
        })
    }
}
