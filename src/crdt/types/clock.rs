//! Per-site counter for minting identifiers.
//!
//! Each replica owns one SiteClock. Counters start at 0, the first minted
//! identifier carries 1, and values are never reused.

use crate::crdt::types::identifier::Identifier;
use crate::crdt::types::site::SiteId;
use crate::error::{Error, Result};

/// A strictly increasing counter scoped to one site.
#[derive(Debug, Clone)]
pub struct SiteClock {
    counter: u64,
    site: SiteId,
}

impl SiteClock {
    /// Creates a new clock at counter 0
    pub fn new(site: SiteId) -> Self {
        SiteClock { counter: 0, site }
    }

    /// Advances the counter and returns the identifier for the new value.
    pub fn tick(&mut self) -> Result<Identifier> {
        let counter = self
            .counter
            .checked_add(1)
            .ok_or_else(|| Error::CounterExhausted {
                site: self.site.clone(),
            })?;
        self.counter = counter;
        Ok(Identifier::new(counter, self.site.clone()))
    }

    /// The identifier the next `tick` would return, without advancing.
    pub fn peek(&self) -> Identifier {
        Identifier::new(self.counter.saturating_add(1), self.site.clone())
    }

    /// The last counter value handed out (0 if none yet)
    pub fn current(&self) -> u64 {
        self.counter
    }

    pub fn site(&self) -> &SiteId {
        &self.site
    }
}
