use colored::Colorize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use tagsync_core::{TagDiff, TagPlan, TagSet};

pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Final tags of a plan, annotated with what the pass did to each key.
pub fn plan_table(plan: &TagPlan) -> String {
    let empty = TagSet::new();
    let tags = plan.tags.as_ref().unwrap_or(&empty);
    if tags.is_empty() && plan.diff.deleted.is_empty() {
        return "No tags.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Key", "Value", "Change"]);
    for (key, value) in tags {
        let change = if plan.diff.created_or_updated.contains_key(key) {
            "applied"
        } else {
            "-"
        };
        builder.push_record([key.as_str(), value.as_str(), change]);
    }
    for key in &plan.diff.deleted {
        builder.push_record([key.as_str(), "", "deleted"]);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Created/updated and deleted keys of a diff.
pub fn diff_table(diff: &TagDiff) -> String {
    if !diff.changed {
        return "No changes.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Key", "Action", "Value"]);
    for (key, value) in &diff.created_or_updated {
        builder.push_record([key.as_str(), "apply", value.as_str()]);
    }
    for key in &diff.deleted {
        builder.push_record([key.as_str(), "delete", ""]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn diff_json(diff: &TagDiff) -> Value {
    serde_json::json!({
        "changed": diff.changed,
        "createdOrUpdated": diff.created_or_updated,
        "deleted": diff.deleted,
    })
}
