use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use corpus_types::{ContentHash, DocId, OwnerId};

use crate::error::{MetaError, MetaResult};
use crate::names::{validate_category_name, validate_slug, validate_tag};
use crate::record::{CategoryRecord, DocumentRecord, MetadataPatch};
use crate::traits::MetadataStore;

/// In-memory metadata store for tests and embedding.
///
/// All rows live in `HashMap`s behind a single `RwLock`, which makes every
/// mutating call — including the current-version pointer swap — atomic at
/// the row level: concurrent writers serialize on the lock and the last
/// writer wins.
pub struct InMemoryMetadataStore {
    inner: RwLock<MetaState>,
}

#[derive(Default)]
struct MetaState {
    documents: HashMap<DocId, DocumentRecord>,
    /// Per-owner category records, keyed by name.
    categories: HashMap<OwnerId, HashMap<String, CategoryRecord>>,
}

impl InMemoryMetadataStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MetaState::default()),
        }
    }

    /// Total number of document rows across all owners.
    pub fn document_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").documents.len()
    }
}

impl Default for InMemoryMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up a document enforcing ownership. `NotFound` for an unknown id,
/// `OwnershipMismatch` when the row belongs to someone else.
fn owned_mut<'a>(
    state: &'a mut MetaState,
    owner: &OwnerId,
    doc_id: &DocId,
) -> MetaResult<&'a mut DocumentRecord> {
    let record = state
        .documents
        .get_mut(doc_id)
        .ok_or(MetaError::NotFound(*doc_id))?;
    if record.owner != *owner {
        return Err(MetaError::OwnershipMismatch(*doc_id));
    }
    Ok(record)
}

fn slug_taken(state: &MetaState, owner: &OwnerId, slug: &str, except: Option<&DocId>) -> bool {
    state.documents.values().any(|record| {
        record.owner == *owner && record.slug == slug && Some(&record.doc_id) != except
    })
}

impl MetadataStore for InMemoryMetadataStore {
    fn insert(&self, record: DocumentRecord) -> MetaResult<()> {
        validate_slug(&record.slug)?;
        validate_category_name(&record.category)?;
        for tag in &record.tags {
            validate_tag(tag)?;
        }

        let mut state = self.inner.write().expect("lock poisoned");
        if state.documents.contains_key(&record.doc_id) {
            return Err(MetaError::DuplicateDocument(record.doc_id));
        }
        if slug_taken(&state, &record.owner, &record.slug, None) {
            return Err(MetaError::DuplicateSlug(record.slug));
        }

        debug!(doc = %record.doc_id.short_id(), slug = %record.slug, "inserted document");
        state.documents.insert(record.doc_id, record);
        Ok(())
    }

    fn get(&self, owner: &OwnerId, doc_id: &DocId) -> MetaResult<Option<DocumentRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .documents
            .get(doc_id)
            .filter(|record| record.owner == *owner)
            .cloned())
    }

    fn get_by_slug(&self, owner: &OwnerId, slug: &str) -> MetaResult<Option<DocumentRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .documents
            .values()
            .find(|record| record.owner == *owner && record.slug == slug)
            .cloned())
    }

    fn apply_patch(
        &self,
        owner: &OwnerId,
        doc_id: &DocId,
        patch: MetadataPatch,
        now: DateTime<Utc>,
    ) -> MetaResult<DocumentRecord> {
        // Validate before taking the write path so a malformed patch never
        // half-applies.
        if let Some(slug) = &patch.slug {
            validate_slug(slug)?;
        }
        if let Some(category) = &patch.category {
            validate_category_name(category)?;
        }
        if let Some(tags) = &patch.tags {
            for tag in tags {
                validate_tag(tag)?;
            }
        }

        let mut state = self.inner.write().expect("lock poisoned");

        if let Some(slug) = &patch.slug {
            if slug_taken(&state, owner, slug, Some(doc_id)) {
                return Err(MetaError::DuplicateSlug(slug.clone()));
            }
        }

        let record = owned_mut(&mut state, owner, doc_id)?;
        if let Some(slug) = patch.slug {
            record.slug = slug;
        }
        if let Some(category) = patch.category {
            record.category = category;
        }
        if let Some(tags) = patch.tags {
            // Full replace: the supplied set becomes the entire tag set.
            record.tags = tags;
        }
        if let Some(publish_at) = patch.publish_at {
            record.publish_at = publish_at;
        }
        if let Some(archived) = patch.archived {
            record.archived = archived;
        }
        if let Some(external_project) = patch.external_project {
            record.external_project = external_project;
        }
        record.updated_at = now;

        Ok(record.clone())
    }

    fn upsert_current_version(
        &self,
        owner: &OwnerId,
        doc_id: &DocId,
        new_hash: ContentHash,
        now: DateTime<Utc>,
    ) -> MetaResult<DocumentRecord> {
        let mut state = self.inner.write().expect("lock poisoned");
        let record = owned_mut(&mut state, owner, doc_id)?;
        record.current_version = new_hash;
        record.updated_at = now;
        debug!(
            doc = %doc_id.short_id(),
            version = %new_hash.short_hex(),
            "swapped current version"
        );
        Ok(record.clone())
    }

    fn remove(&self, owner: &OwnerId, doc_id: &DocId) -> MetaResult<bool> {
        let mut state = self.inner.write().expect("lock poisoned");
        match state.documents.get(doc_id) {
            Some(record) if record.owner == *owner => {
                state.documents.remove(doc_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn list(&self, owner: &OwnerId) -> MetaResult<Vec<DocumentRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .documents
            .values()
            .filter(|record| record.owner == *owner)
            .cloned()
            .collect())
    }

    fn put_category(&self, record: CategoryRecord) -> MetaResult<()> {
        validate_category_name(&record.name)?;
        if let Some(parent) = &record.parent {
            validate_category_name(parent)?;
        }
        let mut state = self.inner.write().expect("lock poisoned");
        state
            .categories
            .entry(record.owner)
            .or_default()
            .insert(record.name.clone(), record);
        Ok(())
    }

    fn list_categories(&self, owner: &OwnerId) -> MetaResult<Vec<CategoryRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .categories
            .get(owner)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }

    fn remove_category(&self, owner: &OwnerId, name: &str) -> MetaResult<bool> {
        let mut state = self.inner.write().expect("lock poisoned");
        Ok(state
            .categories
            .get_mut(owner)
            .and_then(|m| m.remove(name))
            .is_some())
    }
}

impl std::fmt::Debug for InMemoryMetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMetadataStore")
            .field("document_count", &self.document_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ROOT_CATEGORY;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn record(owner: &OwnerId, slug: &str) -> DocumentRecord {
        DocumentRecord {
            doc_id: DocId::new(),
            owner: *owner,
            slug: slug.into(),
            category: ROOT_CATEGORY.into(),
            tags: BTreeSet::new(),
            publish_at: None,
            current_version: ContentHash::from_bytes(slug.as_bytes()),
            archived: false,
            external_project: None,
            created_at: ts(1_000),
            updated_at: ts(1_000),
        }
    }

    // -----------------------------------------------------------------------
    // Insert / get
    // -----------------------------------------------------------------------

    #[test]
    fn insert_and_get() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "first-post");
        store.insert(rec.clone()).unwrap();

        let fetched = store.get(&owner, &rec.doc_id).unwrap().unwrap();
        assert_eq!(fetched, rec);
    }

    #[test]
    fn get_by_slug() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "findable");
        store.insert(rec.clone()).unwrap();

        let fetched = store.get_by_slug(&owner, "findable").unwrap().unwrap();
        assert_eq!(fetched.doc_id, rec.doc_id);
        assert!(store.get_by_slug(&owner, "missing").unwrap().is_none());
    }

    #[test]
    fn get_does_not_cross_owners() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "mine");
        store.insert(rec.clone()).unwrap();

        let stranger = OwnerId::ephemeral();
        assert!(store.get(&stranger, &rec.doc_id).unwrap().is_none());
        assert!(store.get_by_slug(&stranger, "mine").unwrap().is_none());
    }

    #[test]
    fn duplicate_doc_id_rejected() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "once");
        store.insert(rec.clone()).unwrap();

        let mut again = rec;
        again.slug = "twice".into();
        let err = store.insert(again).unwrap_err();
        assert!(matches!(err, MetaError::DuplicateDocument(_)));
    }

    #[test]
    fn duplicate_slug_within_owner_rejected() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        store.insert(record(&owner, "taken")).unwrap();

        let err = store.insert(record(&owner, "taken")).unwrap_err();
        assert_eq!(err, MetaError::DuplicateSlug("taken".into()));
    }

    #[test]
    fn same_slug_across_owners_is_fine() {
        let store = InMemoryMetadataStore::new();
        store.insert(record(&OwnerId::ephemeral(), "shared")).unwrap();
        store.insert(record(&OwnerId::ephemeral(), "shared")).unwrap();
        assert_eq!(store.document_count(), 2);
    }

    #[test]
    fn invalid_slug_rejected_on_insert() {
        let store = InMemoryMetadataStore::new();
        let err = store
            .insert(record(&OwnerId::ephemeral(), "Bad Slug"))
            .unwrap_err();
        assert!(matches!(err, MetaError::InvalidName { .. }));
    }

    // -----------------------------------------------------------------------
    // Patching
    // -----------------------------------------------------------------------

    #[test]
    fn patch_updates_only_supplied_fields() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "original");
        store.insert(rec.clone()).unwrap();

        let patch = MetadataPatch {
            category: Some("coding".into()),
            ..Default::default()
        };
        let updated = store
            .apply_patch(&owner, &rec.doc_id, patch, ts(2_000))
            .unwrap();
        assert_eq!(updated.category, "coding");
        assert_eq!(updated.slug, "original"); // untouched
        assert_eq!(updated.updated_at, ts(2_000));
    }

    #[test]
    fn tags_full_replace_vs_leave_unchanged() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let mut rec = record(&owner, "tagged");
        rec.tags = ["rust", "blog"].map(String::from).into();
        store.insert(rec.clone()).unwrap();

        // Absent tags field: unchanged.
        let updated = store
            .apply_patch(&owner, &rec.doc_id, MetadataPatch::default(), ts(2_000))
            .unwrap();
        assert_eq!(updated.tags.len(), 2);

        // Present tags field: full replace.
        let patch = MetadataPatch {
            tags: Some(["archive"].map(String::from).into()),
            ..Default::default()
        };
        let updated = store
            .apply_patch(&owner, &rec.doc_id, patch, ts(3_000))
            .unwrap();
        assert_eq!(updated.tags, ["archive"].map(String::from).into());

        // Present-but-empty set clears all tags.
        let patch = MetadataPatch {
            tags: Some(BTreeSet::new()),
            ..Default::default()
        };
        let updated = store
            .apply_patch(&owner, &rec.doc_id, patch, ts(4_000))
            .unwrap();
        assert!(updated.tags.is_empty());
    }

    #[test]
    fn publish_at_tri_state() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "scheduled");
        store.insert(rec.clone()).unwrap();

        // Set a schedule.
        let patch = MetadataPatch {
            publish_at: Some(Some(ts(5_000))),
            ..Default::default()
        };
        let updated = store
            .apply_patch(&owner, &rec.doc_id, patch, ts(2_000))
            .unwrap();
        assert_eq!(updated.publish_at, Some(ts(5_000)));

        // Absent field leaves it alone.
        let updated = store
            .apply_patch(&owner, &rec.doc_id, MetadataPatch::default(), ts(2_500))
            .unwrap();
        assert_eq!(updated.publish_at, Some(ts(5_000)));

        // Explicit clear reverts to draft.
        let patch = MetadataPatch {
            publish_at: Some(None),
            ..Default::default()
        };
        let updated = store
            .apply_patch(&owner, &rec.doc_id, patch, ts(3_000))
            .unwrap();
        assert_eq!(updated.publish_at, None);
    }

    #[test]
    fn slug_change_checks_uniqueness() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        store.insert(record(&owner, "existing")).unwrap();
        let rec = record(&owner, "renameme");
        store.insert(rec.clone()).unwrap();

        let patch = MetadataPatch {
            slug: Some("existing".into()),
            ..Default::default()
        };
        let err = store
            .apply_patch(&owner, &rec.doc_id, patch, ts(2_000))
            .unwrap_err();
        assert_eq!(err, MetaError::DuplicateSlug("existing".into()));
    }

    #[test]
    fn renaming_to_own_slug_is_allowed() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "keep");
        store.insert(rec.clone()).unwrap();

        let patch = MetadataPatch {
            slug: Some("keep".into()),
            ..Default::default()
        };
        assert!(store.apply_patch(&owner, &rec.doc_id, patch, ts(2_000)).is_ok());
    }

    #[test]
    fn patch_enforces_ownership() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "guarded");
        store.insert(rec.clone()).unwrap();

        let stranger = OwnerId::ephemeral();
        let err = store
            .apply_patch(&stranger, &rec.doc_id, MetadataPatch::default(), ts(2_000))
            .unwrap_err();
        assert_eq!(err, MetaError::OwnershipMismatch(rec.doc_id));
    }

    // -----------------------------------------------------------------------
    // Pointer swap
    // -----------------------------------------------------------------------

    #[test]
    fn upsert_swaps_pointer_and_bumps_updated_at() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "versioned");
        store.insert(rec.clone()).unwrap();

        let new_hash = ContentHash::from_bytes(b"v2");
        let updated = store
            .upsert_current_version(&owner, &rec.doc_id, new_hash, ts(2_000))
            .unwrap();
        assert_eq!(updated.current_version, new_hash);
        assert_eq!(updated.updated_at, ts(2_000));
    }

    #[test]
    fn upsert_enforces_ownership() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "locked");
        store.insert(rec.clone()).unwrap();

        let stranger = OwnerId::ephemeral();
        let err = store
            .upsert_current_version(&stranger, &rec.doc_id, ContentHash::from_bytes(b"x"), ts(2_000))
            .unwrap_err();
        assert_eq!(err, MetaError::OwnershipMismatch(rec.doc_id));
    }

    #[test]
    fn upsert_unknown_doc_is_not_found() {
        let store = InMemoryMetadataStore::new();
        let err = store
            .upsert_current_version(
                &OwnerId::ephemeral(),
                &DocId::new(),
                ContentHash::from_bytes(b"x"),
                ts(1),
            )
            .unwrap_err();
        assert!(matches!(err, MetaError::NotFound(_)));
    }

    #[test]
    fn concurrent_pointer_swaps_last_writer_wins() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryMetadataStore::new());
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "contended");
        store.insert(rec.clone()).unwrap();

        let hash_a = ContentHash::from_bytes(b"writer-a");
        let hash_b = ContentHash::from_bytes(b"writer-b");

        let handles: Vec<_> = [hash_a, hash_b]
            .into_iter()
            .map(|hash| {
                let store = Arc::clone(&store);
                let doc_id = rec.doc_id;
                thread::spawn(move || {
                    store
                        .upsert_current_version(&owner, &doc_id, hash, ts(2_000))
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }

        let current = store.get(&owner, &rec.doc_id).unwrap().unwrap().current_version;
        assert!(current == hash_a || current == hash_b);
    }

    // -----------------------------------------------------------------------
    // Remove / list
    // -----------------------------------------------------------------------

    #[test]
    fn remove_is_owner_scoped() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        let rec = record(&owner, "removable");
        store.insert(rec.clone()).unwrap();

        assert!(!store.remove(&OwnerId::ephemeral(), &rec.doc_id).unwrap());
        assert!(store.remove(&owner, &rec.doc_id).unwrap());
        assert!(!store.remove(&owner, &rec.doc_id).unwrap());
    }

    #[test]
    fn list_returns_only_owned() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        store.insert(record(&owner, "one")).unwrap();
        store.insert(record(&owner, "two")).unwrap();
        store.insert(record(&OwnerId::ephemeral(), "other")).unwrap();

        assert_eq!(store.list(&owner).unwrap().len(), 2);
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    #[test]
    fn category_crud() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        store
            .put_category(CategoryRecord {
                owner,
                name: "coding".into(),
                parent: Some("root".into()),
            })
            .unwrap();

        let cats = store.list_categories(&owner).unwrap();
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].name, "coding");

        assert!(store.remove_category(&owner, "coding").unwrap());
        assert!(!store.remove_category(&owner, "coding").unwrap());
        assert!(store.list_categories(&owner).unwrap().is_empty());
    }

    #[test]
    fn categories_are_per_owner() {
        let store = InMemoryMetadataStore::new();
        let owner = OwnerId::ephemeral();
        store
            .put_category(CategoryRecord {
                owner,
                name: "private".into(),
                parent: None,
            })
            .unwrap();

        assert!(store
            .list_categories(&OwnerId::ephemeral())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn invalid_category_name_rejected() {
        let store = InMemoryMetadataStore::new();
        let err = store
            .put_category(CategoryRecord {
                owner: OwnerId::ephemeral(),
                name: "  ".into(),
                parent: None,
            })
            .unwrap_err();
        assert!(matches!(err, MetaError::InvalidName { .. }));
    }
}
