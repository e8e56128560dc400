//! Content-addressed version storage for Corpus.
//!
//! This crate implements the immutable half of the split-storage model:
//! every content snapshot of a document is stored as an opaque payload
//! identified by its BLAKE3 hash (domain-separated), under a namespace path
//! that scopes one lineage. Lineage nodes carry an optional parent hash,
//! forming a strict linear-or-branching append-only history — never a merge.
//!
//! # Design Rules
//!
//! 1. Payloads are immutable once written (content-addressing guarantees this).
//! 2. Within one namespace, every non-root node's parent resolves to an
//!    existing node. Dangling parents are rejected at write time.
//! 3. Lineage nodes are never deleted or overwritten — the store is
//!    append-only.
//! 4. Reads re-verify the digest of the stored bytes; corruption surfaces as
//!    an error, never as silently-trusted data.
//! 5. The store never interprets payload contents — it has no knowledge of
//!    posts, owners, or publishing.
//!
//! # Backends
//!
//! All backends implement the [`VersionStore`] trait:
//!
//! - [`InMemoryVersionStore`] — `HashMap`-based store for tests and embedding

pub mod error;
pub mod hasher;
pub mod memory;
pub mod record;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use hasher::ContentHasher;
pub use memory::InMemoryVersionStore;
pub use record::{SnapshotPayload, VersionRecord};
pub use traits::VersionStore;
