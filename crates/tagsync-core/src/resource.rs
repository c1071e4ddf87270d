use std::collections::BTreeMap;
use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::meta::{Annotations, MetaObject};
use crate::tagger::TagsGetterSetter;
use crate::tags::TagSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ObjectMeta {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: Annotations,
}

/// Tag-carrying section of a resource document. Unknown fields are preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TagSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagSet>,
    #[serde(flatten)]
    pub data: BTreeMap<String, Value>,
}

/// JSON document describing an externally managed resource.
///
/// `spec.tags` holds the desired tags, `status.tags` the tags last observed on
/// the external system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: TagSection,
    #[serde(default, skip_serializing_if = "TagSection::is_empty")]
    pub status: TagSection,
}

impl TagSection {
    pub fn is_empty(&self) -> bool {
        self.tags.is_none() && self.data.is_empty()
    }
}

impl Resource {
    pub fn new(kind: impl Into<String>, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            metadata: ObjectMeta {
                namespace: namespace.into(),
                name: name.into(),
                annotations: Annotations::new(),
            },
            spec: TagSection::default(),
            status: TagSection::default(),
        }
    }

    pub fn with_spec_tags(mut self, tags: TagSet) -> Self {
        self.spec.tags = Some(tags);
        self
    }

    pub fn with_status_tags(mut self, tags: TagSet) -> Self {
        self.status.tags = Some(tags);
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }
}

impl MetaObject for Resource {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    fn name(&self) -> &str {
        &self.metadata.name
    }

    fn annotations(&self) -> &Annotations {
        &self.metadata.annotations
    }

    fn set_annotations(&mut self, annotations: Annotations) {
        self.metadata.annotations = annotations;
    }
}

/// Tag access for [`Resource`] documents with a fixed set of additional tags.
#[derive(Debug, Clone, Default)]
pub struct AdditionalTagsAdapter {
    additional: TagSet,
}

impl AdditionalTagsAdapter {
    pub fn new(additional: TagSet) -> Self {
        Self { additional }
    }
}

impl TagsGetterSetter<Resource> for AdditionalTagsAdapter {
    type Error = Infallible;

    fn actual_tags(&self, resource: &Resource) -> Result<TagSet, Self::Error> {
        Ok(resource.status.tags.clone().unwrap_or_default())
    }

    fn desired_tags(&self, resource: &Resource) -> Result<TagSet, Self::Error> {
        Ok(resource.spec.tags.clone().unwrap_or_default())
    }

    fn additional_tags(&self) -> TagSet {
        self.additional.clone()
    }

    fn set_tags(&self, resource: &mut Resource, tags: Option<TagSet>) -> Result<(), Self::Error> {
        resource.spec.tags = tags;
        Ok(())
    }
}
