//! Wait-loop failure modes.

use std::time::Duration;
use thiserror::Error;

use crate::client::TransportError;

/// Why a wait call ended without a terminal snapshot.
///
/// A resource finishing in a failed state is not an error here; the loop
/// returns that snapshot normally and the caller inspects its state.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The time budget ran out while the resource was still in flight.
    #[error("timed out after {}s waiting on {reference}", .waited.as_secs())]
    Timeout { reference: String, waited: Duration },
    /// A probe failed outright; carried unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
