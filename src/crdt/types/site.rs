//! Site identifier type and related functionality.
//!
//! This module contains the definition of SiteId, which names the counter
//! namespace owned by one participant in the collaboration.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A unique identifier for each replica (collaborator) in the distributed system.
///
/// Every participant generating identifiers must own a distinct site id; two
/// live replicas sharing one can mint colliding identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SiteId(Cow<'static, str>);

impl SiteId {
    /// Site of the synthetic root element shared by every document.
    pub const HEAD: SiteId = SiteId(Cow::Borrowed("HEAD"));

    /// Creates a site id, rejecting the empty string.
    pub fn new(site: impl Into<String>) -> Result<Self> {
        let site = site.into();
        if site.is_empty() {
            return Err(Error::EmptySiteId);
        }
        Ok(SiteId(Cow::Owned(site)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SiteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SiteId::new(s)
    }
}

impl TryFrom<String> for SiteId {
    type Error = Error;

    fn try_from(site: String) -> Result<Self> {
        SiteId::new(site)
    }
}

impl TryFrom<&str> for SiteId {
    type Error = Error;

    fn try_from(site: &str) -> Result<Self> {
        SiteId::new(site)
    }
}

impl From<SiteId> for String {
    fn from(site: SiteId) -> Self {
        site.0.into_owned()
    }
}
