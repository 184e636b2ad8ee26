use cbr_core::logging;
use cbr_core::ops::OpsError;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    logging::init();

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("cbr error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}

/// Wait timeouts get a distinct exit code so scripts can re-run the wait
/// without re-issuing the create.
fn exit_code(err: &anyhow::Error) -> i32 {
    let timed_out = err
        .chain()
        .any(|cause| matches!(cause.downcast_ref(), Some(OpsError::WaitTimeout { .. })));
    if timed_out {
        9
    } else {
        1
    }
}
