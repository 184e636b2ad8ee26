//! Wait loop and backoff policy.
//!
//! This module owns how often a watched resource is probed and when a wait
//! gives up: the delay sequence between probes and the probe/notify/sleep
//! loop bounded by wall-clock time. Backup and restore waits share it.

mod backoff;
mod clock;
mod engine;
mod error;

pub use backoff::{BackoffPolicy, Schedule};
pub use clock::{Clock, SystemClock};
pub use engine::{wait_until_done, WaitConfig, WaitSession};
pub use error::WaitError;
