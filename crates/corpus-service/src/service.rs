use chrono::{DateTime, Utc};
use tracing::debug;

use corpus_meta::names::{validate_category_name, validate_slug, validate_tag};
use corpus_meta::{
    expand, DocumentRecord, MetadataPatch, MetadataStore, ROOT_CATEGORY,
};
use corpus_store::{StoreError, VersionStore};
use corpus_types::{ContentHash, DocId, OwnerId, PublishState};

use crate::clock::Clock;
use crate::content::{ContentPatch, DocumentContent};
use crate::document::{DocKey, Document, NewDocument, VersionSummary};
use crate::error::{ServiceError, ServiceResult};
use crate::filter::{ListFilter, Page, SortKey};

/// The document service: orchestrates the version store and metadata store.
///
/// On create/update it writes content to the version store, updates the
/// metadata row's current-version pointer, and reconciles tags; on read it
/// joins metadata with the content at the current hash. Ownership and
/// existence checks happen here, before any store mutation.
pub struct DocumentService<V, M, C> {
    store: V,
    meta: M,
    clock: C,
}

impl<V: VersionStore, M: MetadataStore, C: Clock> DocumentService<V, M, C> {
    pub fn new(store: V, meta: M, clock: C) -> Self {
        Self { store, meta, clock }
    }

    /// The underlying version store.
    pub fn store(&self) -> &V {
        &self.store
    }

    /// The underlying metadata store.
    pub fn meta(&self) -> &M {
        &self.meta
    }

    // ---- Write path ----

    /// Create a new document: mint a stable id, write the first version
    /// (no parent), insert the metadata record pointing at it.
    pub fn create(
        &self,
        owner: &OwnerId,
        content: DocumentContent,
        new_doc: NewDocument,
    ) -> ServiceResult<Document> {
        // Content and name validation both happen before the version write,
        // so a rejected create leaves no orphan version behind.
        content.validate()?;
        validate_slug(&new_doc.slug)?;
        if let Some(category) = &new_doc.category {
            validate_category_name(category)?;
        }
        for tag in &new_doc.tags {
            validate_tag(tag)?;
        }
        if self.meta.get_by_slug(owner, &new_doc.slug)?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "slug already in use: {}",
                new_doc.slug
            )));
        }

        let now = self.clock.now();
        let doc_id = DocId::new();
        let record = DocumentRecord {
            doc_id,
            owner: *owner,
            slug: new_doc.slug,
            category: new_doc.category.unwrap_or_else(|| ROOT_CATEGORY.to_string()),
            tags: new_doc.tags,
            publish_at: new_doc.publish_at,
            // Placeholder until the version write below supplies the hash.
            current_version: ContentHash::from_digest([0u8; 32]),
            archived: false,
            external_project: new_doc.external_project,
            created_at: now,
            updated_at: now,
        };

        let bytes = content.canonical_bytes()?;
        let hash = self.store.put(&record.namespace(), &bytes, None, now)?;

        let record = DocumentRecord {
            current_version: hash,
            ..record
        };
        self.meta.insert(record.clone())?;

        debug!(doc = %doc_id.short_id(), version = %hash.short_hex(), "created document");
        Ok(Document::assemble(record, content, now))
    }

    /// Apply a partial content and/or metadata update.
    ///
    /// A content change reads the current payload, merges only the supplied
    /// fields over it, writes a new version parented on the current head,
    /// then swaps the pointer — in that order, so a crash mid-way leaves
    /// the document at its prior valid version. A metadata-only change
    /// appends no version. The metadata patch is checked before the content
    /// write, so a rejected patch fails the whole call with neither change
    /// applied.
    pub fn update(
        &self,
        owner: &OwnerId,
        doc_id: &DocId,
        content_patch: ContentPatch,
        metadata_patch: MetadataPatch,
    ) -> ServiceResult<Document> {
        let mut record = self.require(owner, doc_id)?;
        let now = self.clock.now();

        // Check the metadata patch fully up front: it runs after the content
        // write below, and a late rejection would leave a half-applied
        // update behind the error.
        if let Some(slug) = &metadata_patch.slug {
            validate_slug(slug)?;
            if *slug != record.slug && self.meta.get_by_slug(owner, slug)?.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "slug already in use: {slug}"
                )));
            }
        }
        if let Some(category) = &metadata_patch.category {
            validate_category_name(category)?;
        }
        if let Some(tags) = &metadata_patch.tags {
            for tag in tags {
                validate_tag(tag)?;
            }
        }

        if !content_patch.is_empty() {
            let mut merged = self.read_current(&record)?;
            if content_patch.apply(&mut merged) {
                merged.validate()?;
                let bytes = merged.canonical_bytes()?;
                let parent = record.current_version;
                // Version write first, pointer swap last: the failure
                // window leaves an orphaned version, never a dangling
                // pointer.
                let new_hash =
                    self.store
                        .put(&record.namespace(), &bytes, Some(parent), now)?;
                record = self
                    .meta
                    .upsert_current_version(owner, doc_id, new_hash, now)?;
                debug!(
                    doc = %doc_id.short_id(),
                    version = %new_hash.short_hex(),
                    "content updated"
                );
            }
        }

        if !metadata_patch.is_empty() {
            record = self.meta.apply_patch(owner, doc_id, metadata_patch, now)?;
        }

        let content = self.read_current(&record)?;
        Ok(Document::assemble(record, content, now))
    }

    /// Restore a prior version's content as a *new* head.
    ///
    /// The new version's parent is the current head, never `target` — a
    /// restore extends history, it does not rewind the pointer.
    pub fn restore(
        &self,
        owner: &OwnerId,
        doc_id: &DocId,
        target: &ContentHash,
    ) -> ServiceResult<Document> {
        let record = self.require(owner, doc_id)?;
        let now = self.clock.now();

        let payload = self.store.get(&record.namespace(), target)?;
        let new_hash = self.store.put(
            &record.namespace(),
            &payload.data,
            Some(record.current_version),
            now,
        )?;
        let record = self
            .meta
            .upsert_current_version(owner, doc_id, new_hash, now)?;

        debug!(
            doc = %doc_id.short_id(),
            target = %target.short_hex(),
            "restored prior version as new head"
        );
        let content = DocumentContent::from_payload(&payload.data)?;
        Ok(Document::assemble(record, content, now))
    }

    /// Hard-delete the document's metadata row. Version records are left
    /// behind for an out-of-scope retention process.
    pub fn delete(&self, owner: &OwnerId, doc_id: &DocId) -> ServiceResult<()> {
        self.require(owner, doc_id)?;
        if !self.meta.remove(owner, doc_id)? {
            return Err(ServiceError::NotFound(format!(
                "document not found: {doc_id}"
            )));
        }
        Ok(())
    }

    // ---- Read path ----

    /// Fetch one document by stable id or owner-scoped slug.
    pub fn get(&self, owner: &OwnerId, key: &DocKey) -> ServiceResult<Document> {
        let record = self.resolve(owner, key)?;
        let now = self.clock.now();
        let content = self.read_current(&record)?;
        Ok(Document::assemble(record, content, now))
    }

    /// List documents matching `filter`, sorted descending, paginated.
    ///
    /// Publish states are evaluated against the clock's "now"; the category
    /// dimension is expanded to include all descendants. `total` counts
    /// every match of the same predicate, so it stays consistent with the
    /// page contents.
    pub fn list(
        &self,
        owner: &OwnerId,
        filter: &ListFilter,
        offset: usize,
        limit: usize,
    ) -> ServiceResult<Page<Document>> {
        let now = self.clock.now();

        let category_set = match &filter.category {
            Some(name) => Some(expand(&self.meta.list_categories(owner)?, name)?),
            None => None,
        };

        let mut matches: Vec<DocumentRecord> = self
            .meta
            .list(owner)?
            .into_iter()
            .filter(|record| {
                (filter.include_archived || !record.archived)
                    && filter
                        .status
                        .matches(PublishState::evaluate(record.publish_at, now))
                    && category_set
                        .as_ref()
                        .map_or(true, |set| set.contains(&record.category))
                    && filter
                        .tag
                        .as_ref()
                        .map_or(true, |tag| record.tags.contains(tag))
                    && filter
                        .external_project
                        .as_ref()
                        .map_or(true, |p| record.external_project.as_ref() == Some(p))
            })
            .collect();

        match filter.sort {
            SortKey::CreatedAt => matches.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::UpdatedAt => matches.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
            // Option ordering puts None first ascending, so descending
            // sorts drafts last.
            SortKey::PublishAt => matches.sort_by(|a, b| b.publish_at.cmp(&a.publish_at)),
        }

        let total = matches.len();
        let mut items = Vec::new();
        for record in matches.into_iter().skip(offset).take(limit) {
            let content = self.read_current(&record)?;
            items.push(Document::assemble(record, content, now));
        }

        Ok(Page {
            items,
            total,
            offset,
            limit,
        })
    }

    /// Version history for one document, newest first.
    pub fn list_versions(
        &self,
        owner: &OwnerId,
        doc_id: &DocId,
    ) -> ServiceResult<Vec<VersionSummary>> {
        let record = self.require(owner, doc_id)?;
        let records = self.store.list_versions(&record.namespace())?;
        Ok(records
            .into_iter()
            .map(|v| VersionSummary {
                is_current: v.hash == record.current_version,
                hash: v.hash,
                parent: v.parent,
                created_at: v.created_at,
            })
            .collect())
    }

    /// Decode the content stored at an arbitrary version of a document.
    pub fn get_version(
        &self,
        owner: &OwnerId,
        doc_id: &DocId,
        hash: &ContentHash,
    ) -> ServiceResult<DocumentContent> {
        let record = self.require(owner, doc_id)?;
        let payload = self.store.get(&record.namespace(), hash)?;
        DocumentContent::from_payload(&payload.data)
    }

    // ---- Internal helpers ----

    /// Ownership + existence gate for id-addressed operations. Unknown and
    /// unowned documents are indistinguishable to the caller.
    fn require(&self, owner: &OwnerId, doc_id: &DocId) -> ServiceResult<DocumentRecord> {
        self.meta
            .get(owner, doc_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("document not found: {doc_id}")))
    }

    fn resolve(&self, owner: &OwnerId, key: &DocKey) -> ServiceResult<DocumentRecord> {
        match key {
            DocKey::Id(doc_id) => self.require(owner, doc_id),
            DocKey::Slug(slug) => self
                .meta
                .get_by_slug(owner, slug)?
                .ok_or_else(|| ServiceError::NotFound(format!("document not found: {slug}"))),
        }
    }

    /// Read the payload behind the current-version pointer.
    ///
    /// A pointer that fails to resolve is a corruption condition (the
    /// invariant says it always resolves), not a normal NotFound.
    fn read_current(&self, record: &DocumentRecord) -> ServiceResult<DocumentContent> {
        let payload = self
            .store
            .get(&record.namespace(), &record.current_version)
            .map_err(|err| match err {
                StoreError::NotFound { .. } => ServiceError::Corrupt(format!(
                    "current version pointer dangles for {}: {}",
                    record.doc_id,
                    record.current_version.short_hex()
                )),
                other => other.into(),
            })?;
        DocumentContent::from_payload(&payload.data)
    }
}
