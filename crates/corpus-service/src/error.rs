use corpus_meta::MetaError;
use corpus_store::StoreError;

/// Service-boundary error taxonomy.
///
/// Every variant carries a human-readable reason so a transport layer can
/// map it to an appropriate external status. Backend storage error types
/// are translated here and never leak through the service surface.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Unknown stable id, slug, or version hash.
    #[error("not found: {0}")]
    NotFound(String),

    /// Ownership mismatch or duplicate slug within an owner.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored data failed integrity verification. Never silently repaired;
    /// requires out-of-band intervention.
    #[error("data integrity failure: {0}")]
    Corrupt(String),

    /// Malformed content fields (e.g. unsupported format, empty title).
    #[error("validation error: {0}")]
    Validation(String),

    /// Backing store transiently unreachable. The only class eligible for
    /// caller-side retry; the service itself never retries.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::HashMismatch { .. } => Self::Corrupt(err.to_string()),
            // A dangling parent coming back from the store means lineage
            // invariants were violated under us.
            StoreError::DanglingParent { .. } => Self::Corrupt(err.to_string()),
            StoreError::Serialization(_) => Self::Corrupt(err.to_string()),
            StoreError::Io(_) => Self::Unavailable(err.to_string()),
        }
    }
}

impl From<MetaError> for ServiceError {
    fn from(err: MetaError) -> Self {
        match err {
            MetaError::NotFound(_) => Self::NotFound(err.to_string()),
            MetaError::OwnershipMismatch(_)
            | MetaError::DuplicateSlug(_)
            | MetaError::DuplicateDocument(_) => Self::Conflict(err.to_string()),
            MetaError::InvalidName { .. } => Self::Validation(err.to_string()),
            MetaError::CategoryCycle(_) => Self::Corrupt(err.to_string()),
        }
    }
}

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_types::{ContentHash, DocId, NamespacePath, OwnerId};

    fn ns() -> NamespacePath {
        NamespacePath::for_document(&OwnerId::ephemeral(), &DocId::new())
    }

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err: ServiceError = StoreError::NotFound {
            namespace: ns(),
            hash: ContentHash::from_bytes(b"x"),
        }
        .into();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn hash_mismatch_maps_to_corrupt() {
        let err: ServiceError = StoreError::HashMismatch {
            namespace: ns(),
            expected: ContentHash::from_bytes(b"a"),
            computed: ContentHash::from_bytes(b"b"),
        }
        .into();
        assert!(matches!(err, ServiceError::Corrupt(_)));
    }

    #[test]
    fn ownership_mismatch_maps_to_conflict() {
        let err: ServiceError = MetaError::OwnershipMismatch(DocId::new()).into();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn invalid_name_maps_to_validation() {
        let err: ServiceError = MetaError::InvalidName {
            name: "Bad".into(),
            reason: "uppercase".into(),
        }
        .into();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn category_cycle_maps_to_corrupt() {
        let err: ServiceError = MetaError::CategoryCycle("a".into()).into();
        assert!(matches!(err, ServiceError::Corrupt(_)));
    }
}
