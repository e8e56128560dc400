use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{DocId, OwnerId};

/// Key scoping one version lineage in the version store.
///
/// A `NamespacePath` is derived deterministically from `(OwnerId, DocId)`
/// alone — never from the slug or category — so renaming or re-categorizing
/// a document never requires touching its content history.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacePath(String);

impl NamespacePath {
    /// Derive the namespace path for a document.
    pub fn for_document(owner: &OwnerId, doc: &DocId) -> Self {
        Self(format!(
            "docs/{}/{}",
            owner.as_uuid().simple(),
            doc.as_uuid().simple()
        ))
    }

    /// The path as a string key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamespacePath({})", self.0)
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let owner = OwnerId::ephemeral();
        let doc = DocId::new();
        let a = NamespacePath::for_document(&owner, &doc);
        let b = NamespacePath::for_document(&owner, &doc);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_documents_get_distinct_paths() {
        let owner = OwnerId::ephemeral();
        let a = NamespacePath::for_document(&owner, &DocId::new());
        let b = NamespacePath::for_document(&owner, &DocId::new());
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_owners_get_distinct_paths() {
        let doc = DocId::new();
        let a = NamespacePath::for_document(&OwnerId::ephemeral(), &doc);
        let b = NamespacePath::for_document(&OwnerId::ephemeral(), &doc);
        assert_ne!(a, b);
    }

    #[test]
    fn path_embeds_both_components() {
        let owner = OwnerId::ephemeral();
        let doc = DocId::new();
        let path = NamespacePath::for_document(&owner, &doc);
        assert!(path.as_str().starts_with("docs/"));
        assert!(path.as_str().contains(&owner.as_uuid().simple().to_string()));
        assert!(path.as_str().contains(&doc.as_uuid().simple().to_string()));
    }
}
