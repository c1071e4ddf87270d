use anyhow::Result;
use colored::Colorize;
use tagsync_core::{AdditionalTagsAdapter, MetaObject, Resource, TagPlan, TagReconciler, TagSet};

use crate::cli::{OutputFormat, ReconcileArgs};
use crate::commands::read_resource;
use crate::config::AppConfig;
use crate::output::{plan_table, print_json, print_success};

pub fn run(
    cfg: &AppConfig,
    additional: TagSet,
    args: &ReconcileArgs,
    format: OutputFormat,
) -> Result<()> {
    let existing = args
        .existing
        .as_deref()
        .map(|path| read_resource(Some(path)))
        .transpose()?;
    let mut target = read_resource(args.target.as_deref())?;

    let reconciler = TagReconciler::new(AdditionalTagsAdapter::new(additional))
        .with_requeue_interval(cfg.requeue_interval());
    let plan = reconcile(&reconciler, existing.as_ref(), &mut target)?;

    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(&target)?)?,
        OutputFormat::Table => println!("{}", plan_table(&plan)),
    }
    Ok(())
}

/// Run one pass over `target` and report what happened.
pub fn reconcile(
    reconciler: &TagReconciler<AdditionalTagsAdapter>,
    existing: Option<&Resource>,
    target: &mut Resource,
) -> Result<TagPlan> {
    let plan = reconciler.reconcile(existing, target)?;
    let resource = target.resource_ref().to_string();
    if plan.changed() {
        print_success(&format!("Reconciled tags for {}", resource.cyan()));
    } else {
        print_success(&format!("Tags for {} already up to date", resource.cyan()));
    }
    Ok(plan)
}
