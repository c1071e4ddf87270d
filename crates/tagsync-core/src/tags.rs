//! Tag sets and layered merging.

use std::collections::BTreeMap;

/// Mapping from tag key to tag value.
///
/// Ordered so encoded annotations and printed output are stable across runs.
pub type TagSet = BTreeMap<String, String>;

/// Merge tag layers in order. Later layers overwrite earlier ones key-by-key,
/// keys present in only one layer are carried over unchanged.
pub fn merge<'a, I>(layers: I) -> TagSet
where
    I: IntoIterator<Item = &'a TagSet>,
{
    let mut merged = TagSet::new();
    for layer in layers {
        merged.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

/// Collapse an empty tag set into the "no tags" value.
pub fn normalize(tags: TagSet) -> Option<TagSet> {
    if tags.is_empty() { None } else { Some(tags) }
}

/// Build a tag set from `(key, value)` pairs.
pub fn tag_set<K, V, I>(pairs: I) -> TagSet
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_later_layers_win() {
        let base = tag_set([("a", "1"), ("b", "2")]);
        let over = tag_set([("b", "20"), ("c", "3")]);

        let merged = merge([&base, &over]);
        assert_eq!(merged, tag_set([("a", "1"), ("b", "20"), ("c", "3")]));
    }

    #[test]
    fn test_merge_three_layers() {
        let actual = tag_set([("a", "1"), ("c", "3")]);
        let desired = tag_set([("d", "4"), ("a", "desired")]);
        let created = tag_set([("b", "2"), ("a", "created")]);

        let merged = merge([&actual, &desired, &created]);
        assert_eq!(merged.get("a").map(String::as_str), Some("created"));
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_merge_empty_layers() {
        let empty = TagSet::new();
        assert!(merge([&empty, &empty]).is_empty());
        assert!(merge(std::iter::empty::<&TagSet>()).is_empty());

        let one = tag_set([("k", "v")]);
        assert_eq!(merge([&empty, &one, &empty]), one);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(TagSet::new()), None);
        let tags = tag_set([("k", "v")]);
        assert_eq!(normalize(tags.clone()), Some(tags));
    }
}
