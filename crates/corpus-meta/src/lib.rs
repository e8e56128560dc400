//! Mutable document metadata for Corpus.
//!
//! This crate implements the mutable half of the split-storage model: the
//! relational-style records holding a document's routing and identity
//! attributes (slug, category, tags, publish schedule, archived flag) plus
//! the pointer to its current content version. Content bytes never live
//! here — they belong to `corpus-store`.
//!
//! # Key pieces
//!
//! - [`DocumentRecord`] — one row per document, keyed by stable [`DocId`]
//! - [`MetadataPatch`] — partial update with an explicit absent-vs-empty
//!   distinction for tags
//! - [`CategoryRecord`] + [`hierarchy::expand`] — per-owner category forest
//!   and its transitive-descendant resolver
//! - [`MetadataStore`] — the storage trait, with an atomic
//!   `upsert_current_version` pointer swap
//! - [`InMemoryMetadataStore`] — `RwLock`-backed implementation for tests
//!   and embedding
//!
//! [`DocId`]: corpus_types::DocId

pub mod error;
pub mod hierarchy;
pub mod memory;
pub mod names;
pub mod record;
pub mod traits;

pub use error::{MetaError, MetaResult};
pub use hierarchy::expand;
pub use memory::InMemoryMetadataStore;
pub use record::{CategoryRecord, DocumentRecord, MetadataPatch, ROOT_CATEGORY};
pub use traits::MetadataStore;
