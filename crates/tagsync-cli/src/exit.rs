//! Process exit status for a failed run.

use serde_json::{Value, json};
use tagsync_core::{ErrorCategory, ReconcileError};

use crate::output::{print_error, print_json, print_warning};

/// Exit status for any error that a retry will not fix by itself.
pub const EXIT_FAILURE: i32 = 1;

/// Exit status when the pass has to be retried after the tags converge.
pub const EXIT_REQUEUE: i32 = 2;

fn reconcile_error(err: &anyhow::Error) -> Option<&ReconcileError> {
    err.downcast_ref::<ReconcileError>()
}

pub fn exit_code(err: &anyhow::Error) -> i32 {
    match reconcile_error(err) {
        Some(e) if e.is_retryable() => EXIT_REQUEUE,
        _ => EXIT_FAILURE,
    }
}

/// Category of the reconcile failure behind `err`, if there is one.
pub fn category(err: &anyhow::Error) -> Option<ErrorCategory> {
    reconcile_error(err).map(ReconcileError::category)
}

/// Body printed to stdout for a retryable error, telling the caller when to try again.
pub fn requeue_payload(err: &anyhow::Error) -> Option<Value> {
    let after = reconcile_error(err)?.requeue_after()?;
    Some(json!({ "requeueAfterSeconds": after.as_secs() }))
}

/// Report `err` to the user and return the exit status to use.
pub fn report(err: &anyhow::Error) -> i32 {
    if let Some(payload) = requeue_payload(err) {
        print_warning(&format!("{err}"));
        if let Err(e) = print_json(&payload) {
            print_error(&format!("{e:#}"));
            return EXIT_FAILURE;
        }
        return EXIT_REQUEUE;
    }

    let message = format!("{err:#}");
    match category(err) {
        Some(category) => tracing::error!(%category, error = %message, "reconcile failed"),
        None => tracing::error!(error = %message, "command failed"),
    }
    print_error(&message);
    exit_code(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::time::Duration;
    use tagsync_core::{ResourceRef, TagView};

    fn rg() -> ResourceRef {
        ResourceRef::new("ResourceGroup", "default", "my-rg")
    }

    #[test]
    fn test_not_converged_requeues() {
        let err = anyhow::Error::new(ReconcileError::not_converged(
            rg(),
            Duration::from_secs(20),
        ));

        assert_eq!(exit_code(&err), EXIT_REQUEUE);
        assert_eq!(category(&err), Some(ErrorCategory::Pending));
        assert_eq!(
            requeue_payload(&err),
            Some(json!({ "requeueAfterSeconds": 20 }))
        );
    }

    #[test]
    fn test_not_converged_behind_context_still_requeues() {
        let err = Err::<(), _>(ReconcileError::not_converged(rg(), Duration::from_secs(5)))
            .context("reconciling target.json")
            .unwrap_err();

        assert_eq!(exit_code(&err), EXIT_REQUEUE);
        assert_eq!(
            requeue_payload(&err),
            Some(json!({ "requeueAfterSeconds": 5 }))
        );
    }

    #[test]
    fn test_capability_error_fails() {
        let err = anyhow::Error::new(ReconcileError::getter(TagView::Actual, rg(), "boom"));

        assert_eq!(exit_code(&err), EXIT_FAILURE);
        assert_eq!(category(&err), Some(ErrorCategory::Capability));
        assert!(requeue_payload(&err).is_none());
    }

    #[test]
    fn test_plain_error_fails() {
        let err = anyhow::anyhow!("boom");

        assert_eq!(exit_code(&err), EXIT_FAILURE);
        assert!(category(&err).is_none());
        assert!(requeue_payload(&err).is_none());
    }
}
