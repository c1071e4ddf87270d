//! Tag reconciliation pass.
//!
//! A pass runs the convergence gate against the existing resource, diffs the
//! configured additional tags against the last-applied snapshot, merges actual,
//! desired and changed tags, removes deleted keys and records the new snapshot
//! in the target's annotations.

use std::time::Duration;

use crate::convergence::check_converged;
use crate::diff::{TagDiff, diff};
use crate::error::{ReconcileError, Result, TagView};
use crate::last_applied::{LAST_APPLIED_TAGS_ANNOTATION, LastAppliedSnapshot};
use crate::meta::{Annotations, MetaObject};
use crate::tagger::TagsGetterSetter;
use crate::tags::{TagSet, merge, normalize};

/// Requeue interval reported when a pass waits for convergence.
pub const DEFAULT_REQUEUE_INTERVAL: Duration = Duration::from_secs(20);

/// Result of a reconciliation pass, ready to be applied to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct TagPlan {
    /// Final tags for the target. `None` when no tags remain.
    pub tags: Option<TagSet>,
    /// Target annotations with the new last-applied snapshot merged in.
    pub annotations: Annotations,
    pub diff: TagDiff,
}

impl TagPlan {
    /// Whether the pass created, updated or deleted any tag.
    pub fn changed(&self) -> bool {
        self.diff.changed
    }

    /// Write the final tags and annotations onto `target`.
    pub fn apply_to<O, T>(&self, tagger: &T, target: &mut O) -> Result<()>
    where
        O: MetaObject,
        T: TagsGetterSetter<O>,
    {
        tagger
            .set_tags(target, self.tags.clone())
            .map_err(|e| ReconcileError::setter(target.resource_ref(), e))?;
        target.set_annotations(self.annotations.clone());
        Ok(())
    }
}

/// Reconciles tags through a caller-supplied [`TagsGetterSetter`].
#[derive(Debug, Clone)]
pub struct TagReconciler<T> {
    tagger: T,
    requeue_interval: Duration,
}

impl<T> TagReconciler<T> {
    pub fn new(tagger: T) -> Self {
        Self {
            tagger,
            requeue_interval: DEFAULT_REQUEUE_INTERVAL,
        }
    }

    pub fn with_requeue_interval(mut self, requeue_interval: Duration) -> Self {
        self.requeue_interval = requeue_interval;
        self
    }

    pub fn tagger(&self) -> &T {
        &self.tagger
    }

    pub fn requeue_interval(&self) -> Duration {
        self.requeue_interval
    }

    /// Compute the tags and annotations `target` should end up with.
    ///
    /// `existing` is the live object, absent when the resource is being
    /// created. Nothing is mutated; see [`TagReconciler::reconcile`] to apply.
    pub fn plan<O>(&self, existing: Option<&O>, target: &O) -> Result<TagPlan>
    where
        O: MetaObject,
        T: TagsGetterSetter<O>,
    {
        let observed = check_converged(&self.tagger, existing, self.requeue_interval)?;

        let mut last_applied = LastAppliedSnapshot::new();
        let mut actual = TagSet::new();
        if let (Some(existing), Some(observed)) = (existing, observed) {
            let raw = existing
                .annotations()
                .get(LAST_APPLIED_TAGS_ANNOTATION)
                .map(String::as_str);
            last_applied =
                LastAppliedSnapshot::decode(raw).map_err(|source| ReconcileError::Decode {
                    annotation: LAST_APPLIED_TAGS_ANNOTATION,
                    resource: existing.resource_ref(),
                    source,
                })?;
            tracing::debug!(
                resource = %existing.resource_ref(),
                last_applied = last_applied.len(),
                "decoded last-applied tags"
            );
            actual = observed.actual;
        }

        let additional = self.tagger.additional_tags();
        let tag_diff = diff(&last_applied, &additional, &actual);

        let desired = self
            .tagger
            .desired_tags(target)
            .map_err(|e| ReconcileError::getter(TagView::Desired, target.resource_ref(), e))?;

        let mut tags = merge([&actual, &desired, &tag_diff.created_or_updated]);
        for key in &tag_diff.deleted {
            tags.remove(key);
        }

        // Written even when nothing changed so a freshly created resource
        // carries the snapshot right away.
        let encoded = tag_diff
            .new_snapshot
            .encode()
            .map_err(|source| ReconcileError::Encode {
                annotation: LAST_APPLIED_TAGS_ANNOTATION,
                resource: target.resource_ref(),
                source,
            })?;
        let mut annotations = target.annotations().clone();
        annotations.insert(LAST_APPLIED_TAGS_ANNOTATION.to_string(), encoded);

        tracing::info!(
            resource = %target.resource_ref(),
            created_or_updated = tag_diff.created_or_updated.len(),
            deleted = tag_diff.deleted.len(),
            changed = tag_diff.changed,
            "tags reconciled"
        );

        Ok(TagPlan {
            tags: normalize(tags),
            annotations,
            diff: tag_diff,
        })
    }

    /// Plan a pass and apply it to `target`.
    ///
    /// On error `target` is left untouched, except when the setter itself fails.
    pub fn reconcile<O>(&self, existing: Option<&O>, target: &mut O) -> Result<TagPlan>
    where
        O: MetaObject,
        T: TagsGetterSetter<O>,
    {
        let plan = self.plan(existing, target)?;
        plan.apply_to(&self.tagger, target)?;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::RECONCILE_POLICY_ANNOTATION;
    use crate::resource::{AdditionalTagsAdapter, Resource};
    use crate::tags::tag_set;
    use std::collections::BTreeSet;

    fn reconciler(additional: TagSet) -> TagReconciler<AdditionalTagsAdapter> {
        TagReconciler::new(AdditionalTagsAdapter::new(additional))
    }

    fn rg() -> Resource {
        Resource::new("ResourceGroup", "default", "rg")
    }

    #[test]
    fn test_create_merges_desired_and_additional() {
        let r = reconciler(tag_set([("owner", "platform"), ("env", "override")]));
        let mut target = rg()
            .with_spec_tags(tag_set([("env", "dev"), ("app", "web")]))
            .with_annotation("team", "infra");

        let plan = r.reconcile(None, &mut target).unwrap();

        assert!(plan.changed());
        assert_eq!(
            target.spec.tags,
            Some(tag_set([
                ("app", "web"),
                ("env", "override"),
                ("owner", "platform")
            ]))
        );
        assert_eq!(
            target.metadata.annotations.get(LAST_APPLIED_TAGS_ANNOTATION),
            Some(&r#"{"env":"override","owner":"platform"}"#.to_string())
        );
        assert_eq!(
            target.metadata.annotations.get("team"),
            Some(&"infra".to_string())
        );
    }

    #[test]
    fn test_create_with_nothing_yields_no_tags() {
        let r = reconciler(TagSet::new());
        let mut target = rg();

        let plan = r.reconcile(None, &mut target).unwrap();
        assert!(!plan.changed());
        assert!(target.spec.tags.is_none());
        assert_eq!(
            target.metadata.annotations.get(LAST_APPLIED_TAGS_ANNOTATION),
            Some(&"{}".to_string())
        );
    }

    #[test]
    fn test_update_scenario() {
        let r = reconciler(tag_set([("b", "2")]));
        let existing = rg()
            .with_spec_tags(tag_set([("a", "1"), ("c", "3")]))
            .with_status_tags(tag_set([("a", "1"), ("c", "3")]))
            .with_annotation(LAST_APPLIED_TAGS_ANNOTATION, r#"{"a":"1"}"#);
        let mut target = rg().with_spec_tags(tag_set([("d", "4")]));

        let plan = r.reconcile(Some(&existing), &mut target).unwrap();

        assert_eq!(plan.diff.created_or_updated, tag_set([("b", "2")]));
        assert_eq!(plan.diff.deleted, BTreeSet::from(["a".to_string()]));
        assert_eq!(
            target.spec.tags,
            Some(tag_set([("b", "2"), ("c", "3"), ("d", "4")]))
        );
        assert_eq!(
            target.metadata.annotations.get(LAST_APPLIED_TAGS_ANNOTATION),
            Some(&r#"{"b":"2"}"#.to_string())
        );
    }

    #[test]
    fn test_update_emptied_tags_normalize_to_none() {
        let r = reconciler(TagSet::new());
        let existing = rg()
            .with_spec_tags(tag_set([("a", "1")]))
            .with_status_tags(tag_set([("a", "1")]))
            .with_annotation(LAST_APPLIED_TAGS_ANNOTATION, r#"{"a":"1"}"#);
        let mut target = rg();

        let plan = r.reconcile(Some(&existing), &mut target).unwrap();
        assert!(plan.changed());
        assert_eq!(plan.tags, None);
        assert!(target.spec.tags.is_none());
    }

    #[test]
    fn test_not_converged_leaves_target_untouched() {
        let r = reconciler(tag_set([("b", "2")]));
        let existing = rg()
            .with_spec_tags(tag_set([("a", "2")]))
            .with_status_tags(tag_set([("a", "1")]))
            .with_annotation(RECONCILE_POLICY_ANNOTATION, "manage");
        let mut target = rg().with_spec_tags(tag_set([("d", "4")]));
        let before = target.clone();

        let err = r.reconcile(Some(&existing), &mut target).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.requeue_after(), Some(DEFAULT_REQUEUE_INTERVAL));
        assert_eq!(target, before);
    }

    #[test]
    fn test_custom_requeue_interval() {
        let r = reconciler(TagSet::new()).with_requeue_interval(Duration::from_secs(5));
        let existing = rg()
            .with_spec_tags(tag_set([("a", "2")]))
            .with_annotation(RECONCILE_POLICY_ANNOTATION, "manage");

        let err = r.plan(Some(&existing), &rg()).unwrap_err();
        assert_eq!(err.requeue_after(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_snapshot_is_decode_error() {
        let r = reconciler(TagSet::new());
        let existing = rg().with_annotation(LAST_APPLIED_TAGS_ANNOTATION, "{oops");
        let mut target = rg().with_spec_tags(tag_set([("d", "4")]));
        let before = target.clone();

        let err = r.reconcile(Some(&existing), &mut target).unwrap_err();
        assert!(matches!(err, ReconcileError::Decode { .. }));
        assert!(!err.is_retryable());
        assert_eq!(target, before);
    }

    #[test]
    fn test_empty_snapshot_annotation_is_empty() {
        let r = reconciler(tag_set([("b", "2")]));
        let existing = rg()
            .with_status_tags(tag_set([("x", "1")]))
            .with_spec_tags(tag_set([("x", "1")]))
            .with_annotation(LAST_APPLIED_TAGS_ANNOTATION, "");

        let plan = r.plan(Some(&existing), &rg()).unwrap();
        assert!(plan.diff.deleted.is_empty());
        assert_eq!(plan.tags, Some(tag_set([("b", "2"), ("x", "1")])));
    }
}
