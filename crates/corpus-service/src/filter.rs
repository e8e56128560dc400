use serde::{Deserialize, Serialize};

use corpus_types::PublishState;

/// Publish-state dimension of a listing filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Draft,
    Scheduled,
    Published,
    #[default]
    All,
}

impl StatusFilter {
    /// Whether a document in `state` passes this filter.
    pub fn matches(&self, state: PublishState) -> bool {
        match self {
            Self::All => true,
            Self::Draft => state.is_draft(),
            Self::Scheduled => state.is_scheduled(),
            Self::Published => state.is_published(),
        }
    }
}

/// Sort key for listings. Always descending (newest first).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    PublishAt,
}

/// Listing filter. Dimensions compose with logical AND; an unset dimension
/// matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    /// Archived documents are excluded unless this is set.
    pub include_archived: bool,
    pub status: StatusFilter,
    /// Expanded through the category hierarchy: matches the named category
    /// plus all its descendants.
    pub category: Option<String>,
    /// Exact tag match.
    pub tag: Option<String>,
    /// Linked external project id.
    pub external_project: Option<String>,
    pub sort: SortKey,
}

/// One page of results plus the total count under the same predicate, so
/// page content and reported total never disagree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}
