//! CRDT (Conflict-free Replicated Data Type) implementation module.
//!
//! This module contains the RGA (Replicated Growable Array) sequence, the
//! replica protocol built on top of it, and their supporting types.

pub mod document;
pub mod element;
pub mod inbox;
pub mod operation;
pub mod replica;
pub mod types;

// Re-export the main public API
pub use document::{Document, Elements, Outcome};
pub use element::Element;
pub use inbox::Inbox;
pub use operation::Operation;
pub use replica::Replica;
pub use types::{Identifier, SiteClock, SiteId};
