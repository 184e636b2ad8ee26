//! Backup operations: create, wait, index download.

use super::{wait_and_translate, OpsError, BACKUP_WAIT, OPERATION_WAIT};
use crate::client::{BackupParams, BackupService, OperationStatus};
use crate::names;
use crate::poll::{BackupProber, OperationProber, PollResult};
use crate::retry::{WaitConfig, WaitSession};

/// Issues the create request and returns the tracking operation without
/// waiting on it.
pub fn create_backup<S>(
    service: &S,
    plan: &str,
    backup_id: &str,
    params: &BackupParams,
) -> Result<OperationStatus, OpsError>
where
    S: BackupService,
{
    names::ensure_backup_plan(plan)?;
    names::ensure_id("backup", backup_id)?;
    let op = service.create_backup(plan, backup_id, params)?;
    tracing::info!("backup {} create accepted, operation {}", backup_id, op.name);
    Ok(op)
}

/// Creates the backup, then waits for the accepted operation to finish.
///
/// The returned snapshot is the operation's. The backup itself may still be
/// uploading data afterwards; [`wait_for_backup`] watches that.
pub fn create_backup_and_wait<S, F>(
    service: &S,
    plan: &str,
    backup_id: &str,
    params: &BackupParams,
    cfg: &WaitConfig,
    on_status: F,
) -> Result<PollResult, OpsError>
where
    S: BackupService,
    F: FnMut(&PollResult, &WaitSession),
{
    let backup = names::backup_name(plan, backup_id)?;
    let op = create_backup(service, plan, backup_id, params)?;
    println!("Create in progress for backup {backup_id} [{}].", op.name);
    let prober = OperationProber::new(service);
    wait_and_translate(
        &prober,
        &op.name,
        cfg,
        on_status,
        &OPERATION_WAIT,
        format!("cbr backup describe {backup}"),
    )
}

/// Polls the backup until it reaches a terminal state.
///
/// A backup finishing in `FAILED` is a normal return; callers inspect the
/// snapshot's state. Only a blown wait budget or a failed probe errors.
pub fn wait_for_backup<S, F>(
    service: &S,
    backup: &str,
    cfg: &WaitConfig,
    on_status: F,
) -> Result<PollResult, OpsError>
where
    S: BackupService,
    F: FnMut(&PollResult, &WaitSession),
{
    names::ensure_backup(backup)?;
    let prober = BackupProber::new(service);
    wait_and_translate(
        &prober,
        backup,
        cfg,
        on_status,
        &BACKUP_WAIT,
        format!("cbr backup describe {backup}"),
    )
}

/// Short-lived signed URL for downloading the backup's index.
pub fn backup_index_download_url<S>(service: &S, backup: &str) -> Result<String, OpsError>
where
    S: BackupService,
{
    names::ensure_backup(backup)?;
    Ok(service.backup_index_download_url(backup)?)
}
