//! Causal delivery buffer.
//!
//! `Replica::apply` refuses an Insert whose anchor is unknown. A host whose
//! transport can reorder messages puts an `Inbox` in front of the replica:
//! operations that are not ready yet wait here and are retried each time a
//! delivery changes the document.

use std::mem;

use tracing::trace;

use crate::crdt::document::{Document, Outcome};
use crate::crdt::operation::Operation;
use crate::crdt::replica::Replica;
use crate::error::Result;

/// Parks operations that arrived ahead of their dependencies.
///
/// An Insert waits for its anchor. A Delete waits for its target, so a delete
/// that overtakes the matching insert is not lost.
#[derive(Debug, Default)]
pub struct Inbox {
    pending: Vec<Operation>,
}

impl Inbox {
    pub fn new() -> Self {
        Inbox::default()
    }

    /// Applies `op` if its dependency is present, otherwise parks it.
    ///
    /// Returns the outcome of applying `op` itself (`Unchanged` when parked).
    pub fn deliver(&mut self, replica: &mut Replica, op: Operation) -> Result<Outcome> {
        if !is_ready(replica.document(), &op) {
            trace!(site = %replica.site(), id = %op.id(), "parking operation");
            if !self.pending.contains(&op) {
                self.pending.push(op);
            }
            return Ok(Outcome::Unchanged);
        }

        let outcome = replica.apply(&op)?;
        if outcome.is_changed() {
            self.flush(replica)?;
        }
        Ok(outcome)
    }

    /// Number of operations still waiting.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Retries parked operations until none of them can make progress.
    fn flush(&mut self, replica: &mut Replica) -> Result<()> {
        loop {
            let (ready, waiting): (Vec<_>, Vec<_>) = mem::take(&mut self.pending)
                .into_iter()
                .partition(|op| is_ready(replica.document(), op));
            self.pending = waiting;
            if ready.is_empty() {
                return Ok(());
            }
            for op in &ready {
                replica.apply(op)?;
            }
        }
    }
}

fn is_ready(document: &Document, op: &Operation) -> bool {
    match op {
        Operation::Insert { after, .. } => document.contains(after),
        Operation::Delete { id } => document.contains(id),
    }
}
