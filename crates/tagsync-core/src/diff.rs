//! Three-way tag diff against the last-applied snapshot.

use std::collections::BTreeSet;

use crate::last_applied::LastAppliedSnapshot;
use crate::tags::TagSet;

/// Outcome of comparing additional tags with the last-applied snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagDiff {
    /// True when anything has to be written or removed.
    pub changed: bool,
    /// Additional tags that are new or whose value changed since the last pass.
    pub created_or_updated: TagSet,
    /// Previously managed keys to drop from the resource.
    pub deleted: BTreeSet<String>,
    /// Snapshot to persist for the next pass.
    pub new_snapshot: LastAppliedSnapshot,
}

/// Compute the tag changes a pass has to make.
///
/// A key that was applied before but is no longer requested is deleted only
/// while `actual` still carries the value the controller wrote. Any other
/// value means someone else took over the tag, so it is left alone.
pub fn diff(
    last_applied: &LastAppliedSnapshot,
    additional: &TagSet,
    actual: &TagSet,
) -> TagDiff {
    let created_or_updated: TagSet = additional
        .iter()
        .filter(|(key, value)| !last_applied.matches(key, value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut deleted = BTreeSet::new();
    for key in last_applied.keys() {
        if additional.contains_key(key) {
            continue;
        }
        match actual.get(key) {
            Some(current) if last_applied.matches(key, current) => {
                deleted.insert(key.clone());
            }
            Some(current) => {
                tracing::debug!(
                    tag = %key,
                    current = %current,
                    "tag changed outside the controller, leaving it in place"
                );
            }
            None => {}
        }
    }

    TagDiff {
        changed: !created_or_updated.is_empty() || !deleted.is_empty(),
        created_or_updated,
        deleted,
        new_snapshot: LastAppliedSnapshot::from(additional),
    }
}
