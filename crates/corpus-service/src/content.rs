use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Markup format of a document body.
///
/// The tagged variant is validated at the service boundary before any store
/// call; the version store itself never interprets payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Markdown,
    Html,
    PlainText,
}

impl ContentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::PlainText => "plaintext",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentFormat {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "plaintext" => Ok(Self::PlainText),
            other => Err(ServiceError::Validation(format!(
                "unsupported content format: {other:?}"
            ))),
        }
    }
}

/// The content fields of one document snapshot.
///
/// This struct defines the canonical serialized form: `canonical_bytes`
/// (JSON with the field order fixed by this definition) is the exact byte
/// sequence that is hashed and stored, so two environments serializing the
/// same logical content produce the same content hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub title: String,
    pub body: String,
    pub description: Option<String>,
    pub format: ContentFormat,
}

impl DocumentContent {
    /// Validate boundary rules: non-empty, length-capped title.
    pub fn validate(&self) -> ServiceResult<()> {
        if self.title.trim().is_empty() {
            return Err(ServiceError::Validation("title must not be empty".into()));
        }
        if self.title.len() > MAX_TITLE_LEN {
            return Err(ServiceError::Validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        Ok(())
    }

    /// The canonical serialized form — the bytes that get hashed and stored.
    pub fn canonical_bytes(&self) -> ServiceResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| ServiceError::Validation(format!("content serialization failed: {e}")))
    }

    /// Decode a stored payload. Failure to decode is a data-integrity
    /// problem: the bytes came back hash-verified from the store.
    pub fn from_payload(data: &[u8]) -> ServiceResult<Self> {
        serde_json::from_slice(data)
            .map_err(|e| ServiceError::Corrupt(format!("stored payload failed to decode: {e}")))
    }
}

/// Partial update to a document's content fields.
///
/// `None` fields retain their prior values — partial update, not replace.
/// An empty-string description clears it (the assembled view treats an
/// empty description as absent), keeping the patch shape flat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub description: Option<String>,
    pub format: Option<ContentFormat>,
}

impl ContentPatch {
    /// Returns `true` if the patch supplies no fields.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overlay the supplied fields onto `base`. Returns `true` if anything
    /// actually changed.
    pub fn apply(&self, base: &mut DocumentContent) -> bool {
        let before = base.clone();
        if let Some(title) = &self.title {
            base.title = title.clone();
        }
        if let Some(body) = &self.body {
            base.body = body.clone();
        }
        if let Some(description) = &self.description {
            base.description = if description.is_empty() {
                None
            } else {
                Some(description.clone())
            };
        }
        if let Some(format) = self.format {
            base.format = format;
        }
        *base != before
    }
}
