use chrono::{DateTime, Utc};

use corpus_types::{ContentHash, NamespacePath};

use crate::error::StoreResult;
use crate::record::{SnapshotPayload, VersionRecord};

/// Content-addressed, parent-linked version store.
///
/// All implementations must satisfy these invariants:
/// - Payloads are immutable once written; the same bytes always produce the
///   same hash.
/// - Version identity is `(namespace, hash)`, not content alone: identical
///   content written under two namespaces yields independent lineage nodes.
/// - Writing is idempotent per `(hash, parent)` pair; the same content
///   written again with a *different* parent appends a new lineage node that
///   shares the deduplicated payload bytes.
/// - A `parent` that does not resolve under the namespace is rejected.
/// - Lineage nodes are never deleted or overwritten.
/// - `created_at` is monotonically non-decreasing within a namespace.
pub trait VersionStore: Send + Sync {
    /// Write a payload under `namespace` and return its content hash.
    ///
    /// `parent` must be `None` for the first version of a lineage, or the
    /// hash of an existing version in the same namespace. `created_at` is
    /// supplied by the caller (the clock is injected, never read ambiently).
    fn put(
        &self,
        namespace: &NamespacePath,
        payload: &[u8],
        parent: Option<ContentHash>,
        created_at: DateTime<Utc>,
    ) -> StoreResult<ContentHash>;

    /// Read the payload stored at `hash` under `namespace`.
    ///
    /// Fails with `NotFound` for an unknown path or hash. Implementations
    /// must recompute the digest of the stored bytes and fail with
    /// `HashMismatch` if it differs — corruption is detected, never trusted.
    fn get(&self, namespace: &NamespacePath, hash: &ContentHash) -> StoreResult<SnapshotPayload>;

    /// All lineage nodes under `namespace`, newest first.
    ///
    /// Finite and restartable: safe to call repeatedly, reflects current
    /// store state. An unknown namespace yields an empty list.
    fn list_versions(&self, namespace: &NamespacePath) -> StoreResult<Vec<VersionRecord>>;

    /// Check whether a hash resolves under `namespace`.
    fn exists(&self, namespace: &NamespacePath, hash: &ContentHash) -> StoreResult<bool>;
}
