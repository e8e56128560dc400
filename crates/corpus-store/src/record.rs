use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corpus_types::ContentHash;

/// An opaque content snapshot as held by the store.
///
/// The store never interprets the payload bytes — schema validation of what
/// they contain belongs to the service layer above.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPayload {
    /// The canonical serialized bytes of the snapshot.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl SnapshotPayload {
    /// Wrap raw payload bytes.
    pub fn new(data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { data, size }
    }
}

/// One node in a version lineage.
///
/// Within a namespace path, records form a directed lineage: each non-root
/// record's `parent` references an existing record in the same namespace.
/// The lineage may branch (a restore creates a new head whose parent is the
/// pre-restore head, even when the content equals an ancestor's), but records
/// are never deleted or overwritten.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Content hash of the snapshot this node references.
    pub hash: ContentHash,
    /// The immediately preceding version, or `None` for a root.
    pub parent: Option<ContentHash>,
    /// When this node was appended. Monotonically non-decreasing within a
    /// namespace path.
    pub created_at: DateTime<Utc>,
}

impl VersionRecord {
    /// Returns `true` if this is the first version in its lineage.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn payload_caches_size() {
        let payload = SnapshotPayload::new(b"hello".to_vec());
        assert_eq!(payload.size, 5);
    }

    #[test]
    fn root_has_no_parent() {
        let record = VersionRecord {
            hash: ContentHash::from_bytes(b"v1"),
            parent: None,
            created_at: Utc.timestamp_opt(1_000, 0).unwrap(),
        };
        assert!(record.is_root());

        let child = VersionRecord {
            hash: ContentHash::from_bytes(b"v2"),
            parent: Some(record.hash),
            created_at: Utc.timestamp_opt(2_000, 0).unwrap(),
        };
        assert!(!child.is_root());
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = VersionRecord {
            hash: ContentHash::from_bytes(b"v1"),
            parent: Some(ContentHash::from_bytes(b"v0")),
            created_at: Utc.timestamp_opt(1_000, 0).unwrap(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: VersionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}
