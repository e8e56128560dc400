use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Identity that exclusively controls a set of documents.
///
/// Owner identities are minted by an external identity layer; Corpus treats
/// them as opaque. Every mutating operation is checked against the owning
/// identity, never assumed from context.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(Uuid);

impl OwnerId {
    /// Wrap an externally-issued UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Mint a random owner identity for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 16];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self(Uuid::from_bytes(bytes))
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short identifier for logs (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("owner:{}", &self.0.simple().to_string()[..8])
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({})", self.short_id())
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OwnerId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidId(e.to_string()))
    }
}

/// Stable, immutable identifier for a document.
///
/// A `DocId` is assigned exactly once, at document creation, and never
/// changes for the life of the document. It is fully decoupled from the
/// human-readable slug: renaming a document never touches its `DocId`, and
/// therefore never touches its version lineage.
///
/// UUID v7 is used so that ids sort by creation time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocId(Uuid);

impl DocId {
    /// Mint a new document identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID (for decoding persisted records).
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short identifier for logs (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("doc:{}", &self.0.simple().to_string()[..8])
    }
}

impl Default for DocId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocId({})", self.short_id())
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidId(e.to_string()))
    }
}
