//! Type definitions for the RGA CRDT.
//!
//! This module contains the identity types used throughout the RGA implementation,
//! organized into focused submodules.

pub mod clock;
pub mod identifier;
pub mod site;

pub use clock::SiteClock;
pub use identifier::Identifier;
pub use site::SiteId;
