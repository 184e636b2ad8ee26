//! `cbr restore` – create, wait, describe.

use anyhow::Result;
use cbr_core::client::{BackupService, RestClient, RestoreParams};
use cbr_core::config::CbrConfig;
use cbr_core::names;
use cbr_core::ops;

use super::{expand_restore_plan, parse_labels, print_status, wait_cfg, wait_many, WaitTarget};
use crate::cli::RestoreCmd;

pub async fn run_restore(cmd: RestoreCmd, cfg: &CbrConfig, client: RestClient) -> Result<()> {
    match cmd {
        RestoreCmd::Create {
            plan,
            restore_id,
            backup,
            description,
            labels,
            wait,
            max_wait,
        } => {
            let plan = expand_restore_plan(&plan, cfg)?;
            let params = RestoreParams {
                backup,
                description,
                labels: parse_labels(&labels)?,
                ..RestoreParams::default()
            };
            let wcfg = wait_cfg(cfg, max_wait);
            tokio::task::spawn_blocking(move || -> Result<()> {
                if wait {
                    ops::create_restore_and_wait(
                        &client,
                        &plan,
                        &restore_id,
                        &params,
                        &wcfg,
                        ops::operation_status_printer(),
                    )?;
                } else {
                    let op = ops::create_restore(&client, &plan, &restore_id, &params)?;
                    println!(
                        "Create in progress for restore {restore_id} [{}].",
                        op.name
                    );
                }
                Ok(())
            })
            .await??;
            Ok(())
        }

        RestoreCmd::Wait { names, max_wait } => {
            let wcfg = wait_cfg(cfg, max_wait);
            wait_many(client, names, wcfg, WaitTarget::Restore).await
        }

        RestoreCmd::Describe { name } => {
            names::ensure_restore(&name)?;
            let status =
                tokio::task::spawn_blocking(move || client.get_restore(&name)).await??;
            print_status(&status);
            Ok(())
        }
    }
}
