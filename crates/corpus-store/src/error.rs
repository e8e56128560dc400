use corpus_types::{ContentHash, NamespacePath};

/// Errors from version store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested hash does not exist under the namespace path.
    #[error("version not found under {namespace}: {hash}")]
    NotFound {
        namespace: NamespacePath,
        hash: ContentHash,
    },

    /// Content hash mismatch on read (data corruption).
    #[error("hash mismatch under {namespace}: expected {expected}, computed {computed}")]
    HashMismatch {
        namespace: NamespacePath,
        expected: ContentHash,
        computed: ContentHash,
    },

    /// A write referenced a parent hash that does not exist in the namespace.
    #[error("dangling parent under {namespace}: {parent}")]
    DanglingParent {
        namespace: NamespacePath,
        parent: ContentHash,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for version store operations.
pub type StoreResult<T> = Result<T, StoreError>;
