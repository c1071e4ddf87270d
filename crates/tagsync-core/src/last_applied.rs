//! Persisted snapshot of the additional tags written on the last successful pass.
//!
//! The snapshot lives in a single annotation as a JSON object. Values are kept
//! as raw JSON because annotations can be edited by hand and may hold numbers,
//! booleans or nested values instead of strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tags::TagSet;

/// Annotation tracking the additional tags applied on the previous pass.
pub const LAST_APPLIED_TAGS_ANNOTATION: &str =
    "sigs.k8s.io/cluster-api-provider-azure-last-applied-tags";

/// Additional tags recorded on the previous successful pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LastAppliedSnapshot(BTreeMap<String, Value>);

impl LastAppliedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the annotation value. A missing or empty value yields an empty snapshot.
    pub fn decode(raw: Option<&str>) -> serde_json::Result<Self> {
        match raw {
            None | Some("") => Ok(Self::new()),
            Some(json) => serde_json::from_str(json),
        }
    }

    /// Encode to the annotation wire format.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the value recorded for `key` equals the tag value `value`.
    ///
    /// Only a JSON string with identical contents matches a tag value.
    pub fn matches(&self, key: &str, value: &str) -> bool {
        matches!(self.0.get(key), Some(Value::String(recorded)) if recorded == value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&TagSet> for LastAppliedSnapshot {
    fn from(tags: &TagSet) -> Self {
        Self(
            tags.iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::tag_set;
    use serde_json::json;

    #[test]
    fn test_decode_missing_or_empty() {
        assert!(LastAppliedSnapshot::decode(None).unwrap().is_empty());
        assert!(LastAppliedSnapshot::decode(Some("")).unwrap().is_empty());
    }

    #[test]
    fn test_decode_loose_values() {
        let snapshot =
            LastAppliedSnapshot::decode(Some(r#"{"a":"1","n":1,"b":true,"z":null}"#)).unwrap();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.get("n"), Some(&json!(1)));
        assert!(snapshot.matches("a", "1"));
        assert!(!snapshot.matches("n", "1"));
        assert!(!snapshot.matches("b", "true"));
        assert!(!snapshot.matches("z", ""));
        assert!(!snapshot.matches("missing", "1"));
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        assert!(LastAppliedSnapshot::decode(Some("{not json")).is_err());
        assert!(LastAppliedSnapshot::decode(Some(r#"["a"]"#)).is_err());
    }

    #[test]
    fn test_encode_is_sorted_object() {
        let snapshot = LastAppliedSnapshot::from(&tag_set([("b", "2"), ("a", "1")]));
        assert_eq!(snapshot.encode().unwrap(), r#"{"a":"1","b":"2"}"#);
        assert_eq!(LastAppliedSnapshot::new().encode().unwrap(), "{}");
    }
}
