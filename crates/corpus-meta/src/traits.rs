use chrono::{DateTime, Utc};

use corpus_types::{ContentHash, DocId, OwnerId};

use crate::error::MetaResult;
use crate::record::{CategoryRecord, DocumentRecord, MetadataPatch};

/// Storage backend for document metadata and category records.
///
/// Implementations must be thread-safe (`Send + Sync`). Ownership is
/// enforced at every mutating call, never assumed from context: a mutation
/// naming a document the caller does not own fails before any write.
///
/// `upsert_current_version` must be atomic at the row level (one
/// compare-and-swap-like update): two concurrent swaps on the same document
/// resolve to last-writer-wins, and neither caller observes a torn record.
pub trait MetadataStore: Send + Sync {
    /// Insert a new document record.
    ///
    /// Fails with `DuplicateDocument` if the doc id exists, `DuplicateSlug`
    /// if the owner already uses the slug, or `InvalidName` on a malformed
    /// slug, category, or tag.
    fn insert(&self, record: DocumentRecord) -> MetaResult<()>;

    /// Read a document by stable id. Returns `Ok(None)` if the id is
    /// unknown **or** the document is not owned by `owner` — existence is
    /// not revealed across owners.
    fn get(&self, owner: &OwnerId, doc_id: &DocId) -> MetaResult<Option<DocumentRecord>>;

    /// Read a document by slug within one owner's scope.
    fn get_by_slug(&self, owner: &OwnerId, slug: &str) -> MetaResult<Option<DocumentRecord>>;

    /// Apply a partial metadata update and bump `updated_at`.
    ///
    /// Tag reconciliation is full-replace when the patch carries a tag set;
    /// an absent tag field leaves tags unchanged. Slug changes re-check
    /// per-owner uniqueness.
    fn apply_patch(
        &self,
        owner: &OwnerId,
        doc_id: &DocId,
        patch: MetadataPatch,
        now: DateTime<Utc>,
    ) -> MetaResult<DocumentRecord>;

    /// Atomically swap the current-version pointer and bump `updated_at`.
    ///
    /// Fails with `OwnershipMismatch` if the document does not belong to
    /// `owner`. Last writer wins under concurrency; no torn state.
    fn upsert_current_version(
        &self,
        owner: &OwnerId,
        doc_id: &DocId,
        new_hash: ContentHash,
        now: DateTime<Utc>,
    ) -> MetaResult<DocumentRecord>;

    /// Hard-delete the metadata row. Returns `true` if it existed.
    ///
    /// Version records are not touched — reclaiming them is an out-of-scope
    /// retention concern.
    fn remove(&self, owner: &OwnerId, doc_id: &DocId) -> MetaResult<bool>;

    /// All document records for one owner. Full scan; the per-owner set is
    /// expected to be small.
    fn list(&self, owner: &OwnerId) -> MetaResult<Vec<DocumentRecord>>;

    /// Create or replace a category record for its owner.
    fn put_category(&self, record: CategoryRecord) -> MetaResult<()>;

    /// All category records for one owner.
    fn list_categories(&self, owner: &OwnerId) -> MetaResult<Vec<CategoryRecord>>;

    /// Delete a category record. Returns `true` if it existed. Documents
    /// referencing the name keep their label.
    fn remove_category(&self, owner: &OwnerId, name: &str) -> MetaResult<bool>;
}
