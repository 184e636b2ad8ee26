//! Restore operations: create and wait.

use super::{wait_and_translate, OpsError, OPERATION_WAIT, RESTORE_WAIT};
use crate::client::{BackupService, OperationStatus, RestoreParams};
use crate::names;
use crate::poll::{OperationProber, PollResult, RestoreProber};
use crate::retry::{WaitConfig, WaitSession};

/// Issues the create request and returns the tracking operation without
/// waiting on it. `params.backup` must name the source backup in full.
pub fn create_restore<S>(
    service: &S,
    plan: &str,
    restore_id: &str,
    params: &RestoreParams,
) -> Result<OperationStatus, OpsError>
where
    S: BackupService,
{
    names::ensure_restore_plan(plan)?;
    names::ensure_id("restore", restore_id)?;
    names::ensure_backup(&params.backup)?;
    let op = service.create_restore(plan, restore_id, params)?;
    tracing::info!(
        "restore {} create accepted, operation {}",
        restore_id,
        op.name
    );
    Ok(op)
}

/// Creates the restore, then waits for the accepted operation to finish.
pub fn create_restore_and_wait<S, F>(
    service: &S,
    plan: &str,
    restore_id: &str,
    params: &RestoreParams,
    cfg: &WaitConfig,
    on_status: F,
) -> Result<PollResult, OpsError>
where
    S: BackupService,
    F: FnMut(&PollResult, &WaitSession),
{
    let restore = names::restore_name(plan, restore_id)?;
    let op = create_restore(service, plan, restore_id, params)?;
    println!("Create in progress for restore {restore_id} [{}].", op.name);
    let prober = OperationProber::new(service);
    wait_and_translate(
        &prober,
        &op.name,
        cfg,
        on_status,
        &OPERATION_WAIT,
        format!("cbr restore describe {restore}"),
    )
}

/// Polls the restore until it reaches a terminal state.
///
/// Like backup waits, a `FAILED` restore is a normal return; only a blown
/// wait budget or a failed probe errors.
pub fn wait_for_restore<S, F>(
    service: &S,
    restore: &str,
    cfg: &WaitConfig,
    on_status: F,
) -> Result<PollResult, OpsError>
where
    S: BackupService,
    F: FnMut(&PollResult, &WaitSession),
{
    names::ensure_restore(restore)?;
    let prober = RestoreProber::new(service);
    wait_and_translate(
        &prober,
        restore,
        cfg,
        on_status,
        &RESTORE_WAIT,
        format!("cbr restore describe {restore}"),
    )
}
