//! # RGA Text - Replicated Growable Array
//!
//! A Conflict-free Replicated Data Type (CRDT) for shared text. Any number of
//! replicas insert and delete characters concurrently without a coordinator,
//! and every replica that has seen the same set of operations shows the same
//! text, whatever order the operations arrived in.
//!
//! ## Features
//!
//! - **Conflict-free**: concurrent inserts at the same spot are ordered by Identifier
//! - **Identifier-addressed**: operations name elements, never numeric positions
//! - **Idempotent**: duplicate inserts and repeated deletes are harmless no-ops
//! - **Tombstone-based deletion**: deleted elements stay as anchors for late inserts
//!
//! Transport and persistence are left to the host. `Operation`, `Identifier`
//! and `SiteId` implement serde's traits so any format can carry them.
//!
//! ## Example
//!
//! ```rust
//! use rga_text::{Identifier, Replica, SiteId};
//!
//! let mut alice = Replica::new(SiteId::new("alice").unwrap());
//! let mut bob = Replica::new(SiteId::new("bob").unwrap());
//!
//! let a = alice.insert(&Identifier::HEAD, 'A').unwrap();
//! let b = bob.insert(&Identifier::HEAD, 'B').unwrap();
//!
//! alice.apply(&b).unwrap();
//! bob.apply(&a).unwrap();
//!
//! assert_eq!(alice.document().text(), bob.document().text());
//! ```

pub mod crdt;
pub mod error;

// Re-export the main public API from the CRDT module
pub use crdt::{Document, Element, Elements, Inbox, Operation, Outcome, Replica};
pub use crdt::{Identifier, SiteClock, SiteId};
pub use error::{Error, Result};
