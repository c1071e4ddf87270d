//! Resource identity and annotation access.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Annotation holding the reconcile policy of an externally managed resource.
pub const RECONCILE_POLICY_ANNOTATION: &str = "serviceoperator.azure.com/reconcile-policy";

/// Annotation map as stored on a resource.
pub type Annotations = BTreeMap<String, String>;

/// Minimal view of a resource object the reconciler needs.
pub trait MetaObject {
    /// Kind of the resource, e.g. `ResourceGroup`.
    fn kind(&self) -> &str;

    fn namespace(&self) -> &str;

    fn name(&self) -> &str;

    fn annotations(&self) -> &Annotations;

    /// Replace all annotations on the resource.
    fn set_annotations(&mut self, annotations: Annotations);

    /// Identity used in error messages and log fields.
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(self.kind(), self.namespace(), self.name())
    }

    /// Reconcile policy declared on the resource, if any.
    fn reconcile_policy(&self) -> Option<ReconcilePolicy> {
        self.annotations()
            .get(RECONCILE_POLICY_ANNOTATION)
            .and_then(|raw| raw.parse().ok())
    }
}

/// Kind, namespace and name of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ResourceRef {
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// How the owning operator treats the external resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcilePolicy {
    /// Full management. Tag writes wait for convergence.
    Manage,
    /// The external resource is never modified.
    Skip,
    /// Managed, but left in place when the object is deleted.
    DetachOnDelete,
}

impl ReconcilePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manage => "manage",
            Self::Skip => "skip",
            Self::DetachOnDelete => "detach-on-delete",
        }
    }

    /// Whether divergent tags must settle before the next write.
    pub fn requires_convergence(&self) -> bool {
        matches!(self, Self::Manage)
    }
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reconcile policy: {0}")]
pub struct UnknownPolicy(pub String);

impl FromStr for ReconcilePolicy {
    type Err = UnknownPolicy;

    // Exact match only; the annotation value is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manage" => Ok(Self::Manage),
            "skip" => Ok(Self::Skip),
            "detach-on-delete" => Ok(Self::DetachOnDelete),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}
