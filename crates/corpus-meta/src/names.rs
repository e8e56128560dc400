//! Slug, category, and tag name validation.
//!
//! Valid slugs:
//! - Non-empty, at most 80 characters
//! - Lowercase ASCII letters, digits, and `-` only
//! - Must not start or end with `-`
//! - Must not contain consecutive hyphens (`--`)
//!
//! Category and tag names are freer: non-empty after trimming, at most
//! 64 characters, no control characters, no `/` (reserved for future
//! hierarchical display).

use crate::error::{MetaError, MetaResult};

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 80;

/// Maximum category or tag name length in characters.
pub const MAX_LABEL_LEN: usize = 64;

/// Validate a slug, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use corpus_meta::names::validate_slug;
///
/// assert!(validate_slug("hello-world").is_ok());
/// assert!(validate_slug("post-2024").is_ok());
/// assert!(validate_slug("").is_err());
/// assert!(validate_slug("Has Spaces").is_err());
/// ```
pub fn validate_slug(slug: &str) -> MetaResult<()> {
    if slug.is_empty() {
        return Err(MetaError::InvalidName {
            name: slug.to_string(),
            reason: "slug must not be empty".into(),
        });
    }

    if slug.len() > MAX_SLUG_LEN {
        return Err(MetaError::InvalidName {
            name: slug.to_string(),
            reason: format!("slug must be at most {MAX_SLUG_LEN} characters"),
        });
    }

    for ch in slug.chars() {
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-') {
            return Err(MetaError::InvalidName {
                name: slug.to_string(),
                reason: format!("slug contains forbidden character: {ch:?}"),
            });
        }
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(MetaError::InvalidName {
            name: slug.to_string(),
            reason: "slug must not start or end with '-'".into(),
        });
    }

    if slug.contains("--") {
        return Err(MetaError::InvalidName {
            name: slug.to_string(),
            reason: "slug must not contain consecutive hyphens".into(),
        });
    }

    Ok(())
}

/// Validate a category name. Shares the label rules with tags.
pub fn validate_category_name(name: &str) -> MetaResult<()> {
    validate_label(name, "category")
}

/// Validate a tag.
pub fn validate_tag(name: &str) -> MetaResult<()> {
    validate_label(name, "tag")
}

fn validate_label(name: &str, what: &str) -> MetaResult<()> {
    if name.trim().is_empty() {
        return Err(MetaError::InvalidName {
            name: name.to_string(),
            reason: format!("{what} must not be empty"),
        });
    }

    if name.len() > MAX_LABEL_LEN {
        return Err(MetaError::InvalidName {
            name: name.to_string(),
            reason: format!("{what} must be at most {MAX_LABEL_LEN} characters"),
        });
    }

    if name.chars().any(|ch| ch.is_control()) {
        return Err(MetaError::InvalidName {
            name: name.to_string(),
            reason: format!("{what} must not contain control characters"),
        });
    }

    if name.contains('/') {
        return Err(MetaError::InvalidName {
            name: name.to_string(),
            reason: format!("{what} must not contain '/'"),
        });
    }

    Ok(())
}
