use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publish lifecycle state of a document, derived from its `publish_at`
/// timestamp and a caller-supplied "now".
///
/// There is no stored state machine and no transition API: callers express
/// intent only by setting `publish_at`, and this evaluator reports the
/// consequence. The state is recomputed on every read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    /// No publish timestamp set.
    Draft,
    /// Publish timestamp is in the future.
    Scheduled,
    /// Publish timestamp is at or before "now". Ties favor visibility:
    /// `publish_at == now` counts as published.
    Published,
}

impl PublishState {
    /// Evaluate the publish state for a timestamp pair.
    ///
    /// Pure: `now` is injected by the caller, never read from an ambient
    /// clock, so the evaluation is deterministic under test.
    pub fn evaluate(publish_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match publish_at {
            None => Self::Draft,
            Some(at) if at <= now => Self::Published,
            Some(_) => Self::Scheduled,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled)
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Scheduled => write!(f, "scheduled"),
            Self::Published => write!(f, "published"),
        }
    }
}
