use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corpus_meta::DocumentRecord;
use corpus_types::{ContentHash, DocId, OwnerId, PublishState};

use crate::content::DocumentContent;

/// Key for addressing a document: by stable id or by owner-scoped slug.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocKey {
    Id(DocId),
    Slug(String),
}

impl From<DocId> for DocKey {
    fn from(id: DocId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for DocKey {
    fn from(slug: &str) -> Self {
        Self::Slug(slug.to_string())
    }
}

/// Metadata supplied at document creation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewDocument {
    pub slug: String,
    /// Defaults to the root category when `None`.
    pub category: Option<String>,
    pub tags: BTreeSet<String>,
    pub publish_at: Option<DateTime<Utc>>,
    pub external_project: Option<String>,
}

/// Fully assembled document view: metadata joined with the content at the
/// current version, plus the publish state computed for the request's "now".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: DocId,
    pub owner: OwnerId,
    pub slug: String,
    pub category: String,
    pub tags: BTreeSet<String>,
    pub publish_at: Option<DateTime<Utc>>,
    pub state: PublishState,
    pub archived: bool,
    pub external_project: Option<String>,
    pub current_version: ContentHash,
    pub content: DocumentContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Join a metadata record with its decoded content.
    pub fn assemble(record: DocumentRecord, content: DocumentContent, now: DateTime<Utc>) -> Self {
        let state = PublishState::evaluate(record.publish_at, now);
        Self {
            doc_id: record.doc_id,
            owner: record.owner,
            slug: record.slug,
            category: record.category,
            tags: record.tags,
            publish_at: record.publish_at,
            state,
            archived: record.archived,
            external_project: record.external_project,
            current_version: record.current_version,
            content,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// One entry of a document's version history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub hash: ContentHash,
    pub parent: Option<ContentHash>,
    pub created_at: DateTime<Utc>,
    /// Whether this entry's hash is the document's current version.
    pub is_current: bool,
}
