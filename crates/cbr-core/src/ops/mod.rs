//! Backup and restore operations.
//!
//! The create/wait/read surface the CLI drives. Wait outcomes are
//! translated here: a terminal snapshot passes through (after one final
//! state line), a blown budget becomes [`OpsError::WaitTimeout`] carrying
//! the command that re-checks status out of band, and a failed probe stays
//! the untouched transport error.

mod backup;
mod restore;

pub use backup::{
    backup_index_download_url, create_backup, create_backup_and_wait, wait_for_backup,
};
pub use restore::{create_restore, create_restore_and_wait, wait_for_restore};

use thiserror::Error;

use crate::client::TransportError;
use crate::names::NameError;
use crate::poll::{PollResult, StatusProber};
use crate::retry::{wait_until_done, WaitConfig, WaitError, WaitSession};

/// Failure of a backup/restore operation.
#[derive(Debug, Error)]
pub enum OpsError {
    /// The wait budget ran out before the watched entity finished.
    #[error("timeout waiting for {kind} {name} to complete; run \"{check}\" to check its status")]
    WaitTimeout {
        kind: &'static str,
        name: String,
        check: String,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Name(#[from] NameError),
}

/// What is being waited on, for user-facing lines.
struct WaitKind {
    noun: &'static str,
    title: &'static str,
}

const BACKUP_WAIT: WaitKind = WaitKind {
    noun: "backup",
    title: "Backup",
};
const RESTORE_WAIT: WaitKind = WaitKind {
    noun: "restore",
    title: "Restore",
};
const OPERATION_WAIT: WaitKind = WaitKind {
    noun: "operation",
    title: "Operation",
};

/// Progress printer for backup waits, one line per probe. Constructed fresh
/// per wait call; callers may pass their own callback instead.
pub fn backup_status_printer() -> impl FnMut(&PollResult, &WaitSession) {
    |result: &PollResult, _: &WaitSession| {
        println!(
            "Waiting for backup to complete... Backup state: {}.",
            result.state
        );
    }
}

/// Progress printer for restore waits.
pub fn restore_status_printer() -> impl FnMut(&PollResult, &WaitSession) {
    |result: &PollResult, _: &WaitSession| {
        println!(
            "Waiting for restore to complete... Restore state: {}.",
            result.state
        );
    }
}

/// Progress printer for operation waits.
pub fn operation_status_printer() -> impl FnMut(&PollResult, &WaitSession) {
    |result: &PollResult, _: &WaitSession| {
        println!(
            "Waiting for operation to complete... Operation state: {}.",
            result.state
        );
    }
}

fn wait_and_translate<P, F>(
    prober: &P,
    reference: &str,
    cfg: &WaitConfig,
    on_status: F,
    kind: &WaitKind,
    check: String,
) -> Result<PollResult, OpsError>
where
    P: StatusProber,
    F: FnMut(&PollResult, &WaitSession),
{
    match wait_until_done(prober, reference, cfg, on_status) {
        Ok(result) => {
            println!(
                "{} completed. {} state: {}",
                kind.title, kind.title, result.state
            );
            Ok(result)
        }
        Err(WaitError::Timeout { .. }) => Err(OpsError::WaitTimeout {
            kind: kind.noun,
            name: reference.to_string(),
            check,
        }),
        Err(WaitError::Transport(e)) => Err(OpsError::Transport(e)),
    }
}
