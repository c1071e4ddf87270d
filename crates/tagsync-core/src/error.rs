use std::time::Duration;

use thiserror::Error;

use crate::meta::ResourceRef;

/// Boxed cause returned by a tag getter or setter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which tag view a getter failed to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagView {
    Actual,
    Desired,
}

impl std::fmt::Display for TagView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Actual => write!(f, "actual"),
            Self::Desired => write!(f, "desired"),
        }
    }
}

/// Errors produced by a tag reconciliation pass
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to unmarshal JSON from {annotation} annotation on {resource}")]
    Decode {
        annotation: &'static str,
        resource: ResourceRef,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to get {view} tags for {resource}")]
    Getter {
        view: TagView,
        resource: ResourceRef,
        #[source]
        source: BoxError,
    },

    #[error("failed to set tags for {resource}")]
    Setter {
        resource: ResourceRef,
        #[source]
        source: BoxError,
    },

    #[error("failed to marshal JSON to {annotation} annotation on {resource}")]
    Encode {
        annotation: &'static str,
        resource: ResourceRef,
        #[source]
        source: serde_json::Error,
    },

    #[error("tags for {resource} have not converged, requeue after {}s", .requeue_after.as_secs())]
    NotConverged {
        resource: ResourceRef,
        requeue_after: Duration,
    },
}

impl ReconcileError {
    /// Create a new Getter error
    pub fn getter(
        view: TagView,
        resource: ResourceRef,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Getter {
            view,
            resource,
            source: source.into(),
        }
    }

    /// Create a new Setter error
    pub fn setter(resource: ResourceRef, source: impl Into<BoxError>) -> Self {
        Self::Setter {
            resource,
            source: source.into(),
        }
    }

    /// Create a new NotConverged error
    pub fn not_converged(resource: ResourceRef, requeue_after: Duration) -> Self {
        Self::NotConverged {
            resource,
            requeue_after,
        }
    }

    /// Check if the pass should simply be retried later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotConverged { .. })
    }

    /// Interval the caller should wait before requeueing, for retryable errors
    pub fn requeue_after(&self) -> Option<Duration> {
        match self {
            Self::NotConverged { requeue_after, .. } => Some(*requeue_after),
            _ => None,
        }
    }

    /// Resource the failing pass was working on
    pub fn resource(&self) -> &ResourceRef {
        match self {
            Self::Decode { resource, .. }
            | Self::Getter { resource, .. }
            | Self::Setter { resource, .. }
            | Self::Encode { resource, .. }
            | Self::NotConverged { resource, .. } => resource,
        }
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode { .. } | Self::Encode { .. } => ErrorCategory::Serialization,
            Self::Getter { .. } | Self::Setter { .. } => ErrorCategory::Capability,
            Self::NotConverged { .. } => ErrorCategory::Pending,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Serialization,
    Capability,
    Pending,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialization => write!(f, "serialization"),
            Self::Capability => write!(f, "capability"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// Convenience result type for reconciliation
pub type Result<T> = std::result::Result<T, ReconcileError>;
