//! Tag access capability supplied by the caller.

use crate::meta::MetaObject;
use crate::tags::TagSet;

/// Reads and writes tags on a particular resource type.
///
/// Implementations know where a resource keeps its desired tags (its spec),
/// where the externally observed tags are reported (its status), and which
/// additional tags the controller is configured to manage.
///
/// # Example
///
/// ```ignore
/// struct GroupTags { extra: TagSet }
///
/// impl TagsGetterSetter<ResourceGroup> for GroupTags {
///     type Error = Infallible;
///
///     fn actual_tags(&self, rg: &ResourceGroup) -> Result<TagSet, Self::Error> {
///         Ok(rg.status.tags.clone().unwrap_or_default())
///     }
///     // ...
/// }
/// ```
pub trait TagsGetterSetter<O: MetaObject> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Tags currently observed on the external resource.
    fn actual_tags(&self, resource: &O) -> Result<TagSet, Self::Error>;

    /// Tags computed from the resource specification, excluding additional tags.
    fn desired_tags(&self, resource: &O) -> Result<TagSet, Self::Error>;

    /// Tags the controller is configured to manage on every resource.
    fn additional_tags(&self) -> TagSet;

    /// Write the final tag set onto the resource. `None` means no tags.
    fn set_tags(&self, resource: &mut O, tags: Option<TagSet>) -> Result<(), Self::Error>;
}
