//! Category hierarchy expansion.
//!
//! Expands a category name into itself plus all transitive descendants by
//! walking a parent-name adjacency map with an explicit worklist. The
//! per-owner category set is expected to be small (tens, not millions), so
//! a full scan per call is acceptable; no incremental index is kept.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::warn;

use crate::error::{MetaError, MetaResult};
use crate::record::CategoryRecord;

/// Expand `name` into the set containing it plus every descendant reachable
/// by following parent links forward.
///
/// A name with no matching record expands to the singleton set containing
/// just that name: callers filtering by a nonexistent category simply get no
/// matches, not an error (deliberate permissive policy).
///
/// A cycle reachable from `name` fails with [`MetaError::CategoryCycle`]
/// rather than looping or silently truncating — cyclic category data is
/// corrupt and must surface.
pub fn expand(categories: &[CategoryRecord], name: &str) -> MetaResult<BTreeSet<String>> {
    // Adjacency: parent name -> child names.
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for record in categories {
        if let Some(parent) = &record.parent {
            children
                .entry(parent.as_str())
                .or_default()
                .push(record.name.as_str());
        }
    }

    let mut result = BTreeSet::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut worklist = vec![name];
    visited.insert(name);

    while let Some(current) = worklist.pop() {
        result.insert(current.to_string());
        for child in children.get(current).into_iter().flatten() {
            if !visited.insert(child) {
                warn!(category = %child, "category cycle detected");
                return Err(MetaError::CategoryCycle(child.to_string()));
            }
            worklist.push(child);
        }
    }

    Ok(result)
}
