use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corpus_types::{ContentHash, DocId, NamespacePath, OwnerId};

/// The default category assigned when a document is created without one.
pub const ROOT_CATEGORY: &str = "root";

/// Mutable metadata row for one document.
///
/// The record carries routing and identity attributes only; content bytes
/// live in the version store, reached through `current_version`. That
/// pointer is never null once the document exists and must always resolve
/// against the version store for this document's namespace — a dangling
/// pointer is a corruption condition, not a normal state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Stable identifier, immutable for the life of the document.
    pub doc_id: DocId,
    /// Identity that exclusively controls this document.
    pub owner: OwnerId,
    /// Human-readable, mutable name. Unique per owner.
    pub slug: String,
    /// Category label; defaults to [`ROOT_CATEGORY`] when unset at creation.
    pub category: String,
    /// Order-irrelevant label set.
    pub tags: BTreeSet<String>,
    /// Publish schedule. Absent means draft; future means scheduled;
    /// past-or-present means published.
    pub publish_at: Option<DateTime<Utc>>,
    /// Pointer to the current content version in the version store.
    pub current_version: ContentHash,
    /// Soft-delete flag: archived documents are excluded from default
    /// listings but not physically removed.
    pub archived: bool,
    /// Optional link to an external project.
    pub external_project: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Bumped on any metadata or content mutation.
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// The version-store namespace for this document.
    ///
    /// Derived from `(owner, doc_id)` alone, so slug and category changes
    /// never move the content history.
    pub fn namespace(&self) -> NamespacePath {
        NamespacePath::for_document(&self.owner, &self.doc_id)
    }
}

/// Partial update to a [`DocumentRecord`].
///
/// Every field is optional; `None` means "leave unchanged". In particular
/// the tag set distinguishes absent from empty: `tags: Some(BTreeSet::new())`
/// clears all tags (full-replace reconciliation), while `tags: None` keeps
/// them. Double-`Option` fields (`publish_at`, `external_project`) encode
/// "set to this value" vs. "clear" vs. "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPatch {
    pub slug: Option<String>,
    pub category: Option<String>,
    /// Full-replace tag set when present.
    pub tags: Option<BTreeSet<String>>,
    /// `Some(Some(ts))` schedules, `Some(None)` reverts to draft,
    /// `None` leaves the schedule unchanged.
    pub publish_at: Option<Option<DateTime<Utc>>>,
    pub archived: Option<bool>,
    /// `Some(Some(id))` links, `Some(None)` unlinks, `None` leaves as-is.
    pub external_project: Option<Option<String>>,
}

impl MetadataPatch {
    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// One node of an owner's category forest.
///
/// Categories are unique per owner and form a forest via `parent` name
/// references; `None` marks a top-level category. Cycle detection happens
/// in [`crate::hierarchy::expand`], not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub owner: OwnerId,
    /// Category name, unique per owner.
    pub name: String,
    /// Name of the enclosing category, or `None` for a root.
    pub parent: Option<String>,
}
