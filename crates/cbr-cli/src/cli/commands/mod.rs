//! CLI command handlers, one file per resource kind, plus the shared
//! argument plumbing (plan expansion, label parsing, wait fan-out).

mod backup;
mod restore;

pub use backup::run_backup;
pub use restore::run_restore;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use cbr_core::client::{ResourceStatus, RestClient};
use cbr_core::config::CbrConfig;
use cbr_core::names;
use cbr_core::ops;
use cbr_core::retry::WaitConfig;

#[derive(Debug, Clone, Copy)]
pub(super) enum WaitTarget {
    Backup,
    Restore,
}

/// Expands a bare backup plan id with the configured defaults; full resource
/// names pass through untouched.
pub(super) fn expand_backup_plan(plan: &str, cfg: &CbrConfig) -> Result<String> {
    expand_plan(plan, cfg, "backupPlans")
}

/// Expands a bare restore plan id with the configured defaults.
pub(super) fn expand_restore_plan(plan: &str, cfg: &CbrConfig) -> Result<String> {
    expand_plan(plan, cfg, "restorePlans")
}

fn expand_plan(plan: &str, cfg: &CbrConfig, collection: &str) -> Result<String> {
    if plan.starts_with("projects/") {
        return Ok(plan.to_string());
    }
    let (Some(project), Some(location)) = (&cfg.project, &cfg.location) else {
        bail!(
            "plan {plan:?} is not a full resource name and no default project/location \
             is configured"
        );
    };
    Ok(format!(
        "projects/{project}/locations/{location}/{collection}/{plan}"
    ))
}

/// Parses repeatable `KEY=VALUE` label arguments.
pub(super) fn parse_labels(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut labels = BTreeMap::new();
    for item in raw {
        let Some((key, value)) = item.split_once('=') else {
            bail!("label {item:?} is not KEY=VALUE");
        };
        if key.is_empty() {
            bail!("label {item:?} has an empty key");
        }
        labels.insert(key.to_string(), value.to_string());
    }
    Ok(labels)
}

/// Key/value dump of a resource snapshot, for the describe commands.
pub(super) fn print_status(status: &ResourceStatus) {
    println!("name:        {}", status.name);
    println!("state:       {}", status.state);
    if let Some(reason) = &status.state_reason {
        println!("reason:      {reason}");
    }
    if let Some(description) = &status.description {
        println!("description: {description}");
    }
    if let Some(created) = &status.create_time {
        println!("created:     {created}");
    }
    if let Some(completed) = &status.complete_time {
        println!("completed:   {completed}");
    }
}

/// Wait tuning from config, with `--max-wait` overriding the budget.
pub(super) fn wait_cfg(cfg: &CbrConfig, max_wait: Option<u64>) -> WaitConfig {
    let mut wcfg = cfg.wait_config();
    if let Some(secs) = max_wait {
        wcfg.max_wait = Duration::from_secs(secs);
    }
    wcfg
}

/// Waits on each name in its own blocking task. With several names the
/// progress lines are prefixed with the short resource id so interleaved
/// output stays readable. All waits run to completion before the first
/// failure is returned.
pub(super) async fn wait_many(
    client: RestClient,
    names: Vec<String>,
    wcfg: WaitConfig,
    target: WaitTarget,
) -> Result<()> {
    let client = Arc::new(client);
    let tag_lines = names.len() > 1;
    let mut join_set = tokio::task::JoinSet::new();
    for name in names {
        let client = Arc::clone(&client);
        let wcfg = wcfg.clone();
        let tag = tag_lines.then(|| names::short_id(&name).to_string());
        join_set.spawn_blocking(move || wait_one(&client, &name, &wcfg, target, tag));
    }

    let mut first_err: Option<anyhow::Error> = None;
    while let Some(res) = join_set.join_next().await {
        let outcome = res.map_err(|e| anyhow::anyhow!("wait task join: {}", e))?;
        if let Err(err) = outcome {
            if first_err.is_none() {
                first_err = Some(err);
            }
        }
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn wait_one(
    client: &RestClient,
    name: &str,
    wcfg: &WaitConfig,
    target: WaitTarget,
    tag: Option<String>,
) -> Result<()> {
    match (target, tag) {
        (WaitTarget::Backup, None) => {
            ops::wait_for_backup(client, name, wcfg, ops::backup_status_printer())?;
        }
        (WaitTarget::Backup, Some(tag)) => {
            ops::wait_for_backup(client, name, wcfg, move |r, _| {
                println!(
                    "[{tag}] Waiting for backup to complete... Backup state: {}.",
                    r.state
                );
            })?;
        }
        (WaitTarget::Restore, None) => {
            ops::wait_for_restore(client, name, wcfg, ops::restore_status_printer())?;
        }
        (WaitTarget::Restore, Some(tag)) => {
            ops::wait_for_restore(client, name, wcfg, move |r, _| {
                println!(
                    "[{tag}] Waiting for restore to complete... Restore state: {}.",
                    r.state
                );
            })?;
        }
    }
    Ok(())
}
