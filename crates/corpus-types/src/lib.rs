//! Foundation types for Corpus, the versioned document store.
//!
//! This crate provides the identity, hashing, and publish-state primitives
//! used throughout the Corpus system. Every other Corpus crate depends on
//! `corpus-types`.
//!
//! # Key Types
//!
//! - [`OwnerId`] — Identity that exclusively controls a set of documents
//! - [`DocId`] — Stable, immutable document identifier (UUID v7)
//! - [`ContentHash`] — Content-addressed identifier (BLAKE3 hash)
//! - [`NamespacePath`] — Key scoping one version lineage, derived from
//!   `(OwnerId, DocId)` alone
//! - [`PublishState`] — Draft/scheduled/published classification derived
//!   from a timestamp and an injected "now"

pub mod error;
pub mod hash;
pub mod id;
pub mod namespace;
pub mod publish;

pub use error::TypeError;
pub use hash::ContentHash;
pub use id::{DocId, OwnerId};
pub use namespace::NamespacePath;
pub use publish::PublishState;
