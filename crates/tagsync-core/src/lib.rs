//! # tagsync-core
//!
//! Conflict-aware reconciliation of key/value tags on externally managed resources.
//!
//! Three sources are reconciled on each pass:
//! - the additional tags the controller applied last time, persisted as a JSON
//!   annotation on the resource
//! - the tags currently observed on the external resource
//! - the tags the controller wants now, computed from the resource spec plus a
//!   configured map of additional tags
//!
//! Tags added by hand survive, tags the controller stops managing are removed
//! only while nobody else has changed them, and strictly managed resources are
//! not written until their observed tags catch up with the desired ones.
//!
//! ## Example
//!
//! ```ignore
//! use tagsync_core::{AdditionalTagsAdapter, Resource, TagReconciler, tag_set};
//!
//! let reconciler = TagReconciler::new(AdditionalTagsAdapter::new(tag_set([("owner", "platform")])));
//! let plan = reconciler.reconcile(existing.as_ref(), &mut target)?;
//! if plan.changed() {
//!     client.update(&target)?;
//! }
//! ```

pub mod convergence;
pub mod diff;
pub mod error;
pub mod last_applied;
pub mod meta;
pub mod reconcile;
pub mod resource;
pub mod tagger;
pub mod tags;

pub use convergence::{ObservedTags, check_converged};
pub use diff::{TagDiff, diff};
pub use error::{BoxError, ErrorCategory, ReconcileError, Result, TagView};
pub use last_applied::{LAST_APPLIED_TAGS_ANNOTATION, LastAppliedSnapshot};
pub use meta::{
    Annotations, MetaObject, RECONCILE_POLICY_ANNOTATION, ReconcilePolicy, ResourceRef, UnknownPolicy,
};
pub use reconcile::{DEFAULT_REQUEUE_INTERVAL, TagPlan, TagReconciler};
pub use resource::{AdditionalTagsAdapter, ObjectMeta, Resource, TagSection};
pub use tagger::TagsGetterSetter;
pub use tags::{TagSet, merge, normalize, tag_set};
