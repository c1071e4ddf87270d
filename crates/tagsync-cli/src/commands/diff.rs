use anyhow::{Context, Result};
use tagsync_core::{
    AdditionalTagsAdapter, LAST_APPLIED_TAGS_ANNOTATION, LastAppliedSnapshot, MetaObject,
    Resource, TagDiff, TagSet, TagsGetterSetter, diff,
};

use crate::cli::OutputFormat;
use crate::commands::read_resource;
use crate::output::{diff_json, diff_table, print_json};

pub fn run(additional: TagSet, existing: &str, format: OutputFormat) -> Result<()> {
    let existing = read_resource(Some(existing))?;
    let diff = compute(AdditionalTagsAdapter::new(additional), &existing)?;

    match format {
        OutputFormat::Json => print_json(&diff_json(&diff))?,
        OutputFormat::Table => println!("{}", diff_table(&diff)),
    }
    Ok(())
}

/// Diff the configured additional tags against an existing resource.
pub fn compute<T>(tagger: T, existing: &Resource) -> Result<TagDiff>
where
    T: TagsGetterSetter<Resource>,
{
    let raw = existing
        .annotations()
        .get(LAST_APPLIED_TAGS_ANNOTATION)
        .map(String::as_str);
    let last_applied = LastAppliedSnapshot::decode(raw).with_context(|| {
        format!(
            "failed to unmarshal JSON from {LAST_APPLIED_TAGS_ANNOTATION} annotation on {}",
            existing.resource_ref()
        )
    })?;
    let actual = tagger
        .actual_tags(existing)
        .with_context(|| format!("failed to get actual tags for {}", existing.resource_ref()))?;

    Ok(diff(&last_applied, &tagger.additional_tags(), &actual))
}
