use corpus_types::DocId;

/// Errors from metadata store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MetaError {
    /// No document with this id exists.
    #[error("document not found: {0}")]
    NotFound(DocId),

    /// The document exists but is not owned by the caller.
    #[error("document {0} is not owned by the caller")]
    OwnershipMismatch(DocId),

    /// The owner already has a document with this slug.
    #[error("duplicate slug for owner: {0}")]
    DuplicateSlug(String),

    /// A document with this id already exists.
    #[error("duplicate document id: {0}")]
    DuplicateDocument(DocId),

    /// A slug, category, or tag name failed validation.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The category forest contains a cycle reachable from this name.
    #[error("category cycle detected at {0:?}")]
    CategoryCycle(String),
}

/// Result alias for metadata operations.
pub type MetaResult<T> = Result<T, MetaError>;
