//! Convergence gate for resources that already exist.
//!
//! Desired tags are recomputed from the spec on every pass while actual tags
//! lag behind until the external write lands. Diffing against a stale view
//! would delete or re-add tags on every pass, so strictly managed resources
//! wait until both views agree.

use std::time::Duration;

use crate::error::{ReconcileError, Result, TagView};
use crate::meta::MetaObject;
use crate::tagger::TagsGetterSetter;
use crate::tags::TagSet;

/// Tags read from an existing resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservedTags {
    pub actual: TagSet,
    pub desired: TagSet,
}

impl ObservedTags {
    pub fn converged(&self) -> bool {
        self.actual == self.desired
    }
}

/// Read actual and desired tags of `resource`.
pub fn observe<O, T>(tagger: &T, resource: &O) -> Result<ObservedTags>
where
    O: MetaObject,
    T: TagsGetterSetter<O>,
{
    let actual = tagger
        .actual_tags(resource)
        .map_err(|e| ReconcileError::getter(TagView::Actual, resource.resource_ref(), e))?;
    let desired = tagger
        .desired_tags(resource)
        .map_err(|e| ReconcileError::getter(TagView::Desired, resource.resource_ref(), e))?;
    Ok(ObservedTags { actual, desired })
}

/// Gate a pass on convergence of the existing resource.
///
/// Returns `Ok(None)` when there is no existing resource. Otherwise returns the
/// observed tags, or [`ReconcileError::NotConverged`] when they diverge and the
/// resource is annotated with the `manage` reconcile policy.
pub fn check_converged<O, T>(
    tagger: &T,
    existing: Option<&O>,
    requeue_after: Duration,
) -> Result<Option<ObservedTags>>
where
    O: MetaObject,
    T: TagsGetterSetter<O>,
{
    let Some(existing) = existing else {
        return Ok(None);
    };

    let observed = observe(tagger, existing)?;
    if observed.converged() {
        return Ok(Some(observed));
    }

    let strict = existing
        .reconcile_policy()
        .is_some_and(|policy| policy.requires_convergence());
    if strict {
        tracing::warn!(
            resource = %existing.resource_ref(),
            requeue_after_secs = requeue_after.as_secs(),
            "tags have not converged yet, deferring tag reconciliation"
        );
        return Err(ReconcileError::not_converged(
            existing.resource_ref(),
            requeue_after,
        ));
    }

    tracing::debug!(
        resource = %existing.resource_ref(),
        "tags diverge but reconcile policy is not strict, continuing"
    );
    Ok(Some(observed))
}
