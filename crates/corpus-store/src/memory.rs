use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use corpus_types::{ContentHash, NamespacePath};

use crate::error::{StoreError, StoreResult};
use crate::hasher::ContentHasher;
use crate::record::{SnapshotPayload, VersionRecord};
use crate::traits::VersionStore;

/// In-memory, HashMap-based version store.
///
/// Intended for tests and embedding. All state is held behind a `RwLock`
/// for safe concurrent access. Payload bytes are deduplicated per namespace
/// by content hash; lineage nodes are kept in append order.
pub struct InMemoryVersionStore {
    namespaces: RwLock<HashMap<NamespacePath, NamespaceState>>,
}

#[derive(Default)]
struct NamespaceState {
    /// Deduplicated payload bytes, keyed by content hash.
    payloads: HashMap<ContentHash, Vec<u8>>,
    /// Lineage nodes in append order (oldest first).
    lineage: Vec<VersionRecord>,
}

impl InMemoryVersionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    /// Number of namespaces with at least one version.
    pub fn namespace_count(&self) -> usize {
        self.namespaces.read().expect("lock poisoned").len()
    }

    /// Number of lineage nodes under a namespace.
    pub fn version_count(&self, namespace: &NamespacePath) -> usize {
        self.namespaces
            .read()
            .expect("lock poisoned")
            .get(namespace)
            .map(|ns| ns.lineage.len())
            .unwrap_or(0)
    }

    /// Total payload bytes across all namespaces (deduplicated).
    pub fn total_bytes(&self) -> u64 {
        self.namespaces
            .read()
            .expect("lock poisoned")
            .values()
            .flat_map(|ns| ns.payloads.values())
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Corrupt a stored payload in place. Test-only hook for exercising
    /// hash verification on read.
    #[doc(hidden)]
    pub fn tamper(&self, namespace: &NamespacePath, hash: &ContentHash, data: Vec<u8>) {
        let mut namespaces = self.namespaces.write().expect("lock poisoned");
        if let Some(ns) = namespaces.get_mut(namespace) {
            if let Some(payload) = ns.payloads.get_mut(hash) {
                *payload = data;
            }
        }
    }
}

impl Default for InMemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionStore for InMemoryVersionStore {
    fn put(
        &self,
        namespace: &NamespacePath,
        payload: &[u8],
        parent: Option<ContentHash>,
        created_at: DateTime<Utc>,
    ) -> StoreResult<ContentHash> {
        let hash = ContentHasher::SNAPSHOT.hash(payload);

        let mut namespaces = self.namespaces.write().expect("lock poisoned");
        let ns = namespaces.entry(namespace.clone()).or_default();

        if let Some(parent_hash) = parent {
            if !ns.payloads.contains_key(&parent_hash) {
                return Err(StoreError::DanglingParent {
                    namespace: namespace.clone(),
                    parent: parent_hash,
                });
            }
        }

        // Idempotent per (hash, parent): re-writing the same content with
        // the same parent does not grow the lineage.
        if ns
            .lineage
            .iter()
            .any(|record| record.hash == hash && record.parent == parent)
        {
            return Ok(hash);
        }

        // Clamp to keep created_at monotonically non-decreasing within the
        // namespace, even under clock skew between callers.
        let floor = ns.lineage.last().map(|record| record.created_at);
        let created_at = match floor {
            Some(floor) if created_at < floor => floor,
            _ => created_at,
        };

        ns.payloads
            .entry(hash)
            .or_insert_with(|| payload.to_vec());
        ns.lineage.push(VersionRecord {
            hash,
            parent,
            created_at,
        });

        debug!(
            namespace = %namespace,
            hash = %hash.short_hex(),
            parent = ?parent.map(|p| p.short_hex()),
            "appended version"
        );
        Ok(hash)
    }

    fn get(&self, namespace: &NamespacePath, hash: &ContentHash) -> StoreResult<SnapshotPayload> {
        let namespaces = self.namespaces.read().expect("lock poisoned");
        let data = namespaces
            .get(namespace)
            .and_then(|ns| ns.payloads.get(hash))
            .ok_or_else(|| StoreError::NotFound {
                namespace: namespace.clone(),
                hash: *hash,
            })?;

        // Never trust stored bytes: re-verify the digest on every read.
        let computed = ContentHasher::SNAPSHOT.hash(data);
        if computed != *hash {
            return Err(StoreError::HashMismatch {
                namespace: namespace.clone(),
                expected: *hash,
                computed,
            });
        }

        Ok(SnapshotPayload::new(data.clone()))
    }

    fn list_versions(&self, namespace: &NamespacePath) -> StoreResult<Vec<VersionRecord>> {
        let namespaces = self.namespaces.read().expect("lock poisoned");
        let mut records = namespaces
            .get(namespace)
            .map(|ns| ns.lineage.clone())
            .unwrap_or_default();
        records.reverse(); // newest first
        Ok(records)
    }

    fn exists(&self, namespace: &NamespacePath, hash: &ContentHash) -> StoreResult<bool> {
        let namespaces = self.namespaces.read().expect("lock poisoned");
        Ok(namespaces
            .get(namespace)
            .map(|ns| ns.payloads.contains_key(hash))
            .unwrap_or(false))
    }
}

impl std::fmt::Debug for InMemoryVersionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVersionStore")
            .field("namespace_count", &self.namespace_count())
            .finish()
    }
}
