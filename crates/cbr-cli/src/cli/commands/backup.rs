//! `cbr backup` – create, wait, describe, index-url.

use anyhow::Result;
use cbr_core::client::{BackupParams, BackupService, RestClient};
use cbr_core::config::CbrConfig;
use cbr_core::names;
use cbr_core::ops;

use super::{expand_backup_plan, parse_labels, print_status, wait_cfg, wait_many, WaitTarget};
use crate::cli::BackupCmd;

pub async fn run_backup(cmd: BackupCmd, cfg: &CbrConfig, client: RestClient) -> Result<()> {
    match cmd {
        BackupCmd::Create {
            plan,
            backup_id,
            description,
            labels,
            retain_days,
            delete_lock_days,
            wait,
            max_wait,
        } => {
            let plan = expand_backup_plan(&plan, cfg)?;
            let params = BackupParams {
                description,
                labels: parse_labels(&labels)?,
                retain_days,
                delete_lock_days,
            };
            let wcfg = wait_cfg(cfg, max_wait);
            tokio::task::spawn_blocking(move || -> Result<()> {
                if wait {
                    ops::create_backup_and_wait(
                        &client,
                        &plan,
                        &backup_id,
                        &params,
                        &wcfg,
                        ops::operation_status_printer(),
                    )?;
                } else {
                    let op = ops::create_backup(&client, &plan, &backup_id, &params)?;
                    println!("Create in progress for backup {backup_id} [{}].", op.name);
                }
                Ok(())
            })
            .await??;
            Ok(())
        }

        BackupCmd::Wait { names, max_wait } => {
            let wcfg = wait_cfg(cfg, max_wait);
            wait_many(client, names, wcfg, WaitTarget::Backup).await
        }

        BackupCmd::Describe { name } => {
            names::ensure_backup(&name)?;
            let status =
                tokio::task::spawn_blocking(move || client.get_backup(&name)).await??;
            print_status(&status);
            Ok(())
        }

        BackupCmd::IndexUrl { name } => {
            let url =
                tokio::task::spawn_blocking(move || ops::backup_index_download_url(&client, &name))
                    .await??;
            println!("{url}");
            Ok(())
        }
    }
}
