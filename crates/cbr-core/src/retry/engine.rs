//! The wait loop: probe, notify, back off, bounded only by wall-clock time.

use std::time::Duration;

use super::backoff::BackoffPolicy;
use super::clock::{Clock, SystemClock};
use super::error::WaitError;
use crate::poll::{PollResult, StatusProber};

/// Tuning for one wait call.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitConfig {
    /// Total wall-clock budget before the wait gives up.
    pub max_wait: Duration,
    /// Delay sequence between probes.
    pub backoff: BackoffPolicy,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_secs(30 * 60),
            backoff: BackoffPolicy::default(),
        }
    }
}

/// One wait call's progress, handed to the status callback on every probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSession {
    /// Wall-clock time since the wait started.
    pub elapsed: Duration,
    /// Delay the loop will sleep before the next probe.
    pub next_delay: Duration,
    /// Probes issued so far, including the one behind this snapshot.
    pub probes: u64,
}

/// Polls `prober` for `reference` until the snapshot is terminal.
///
/// Every probe's snapshot is handed to `on_status` before the loop decides
/// anything; the callback is observability only and cannot abort the wait.
/// There is no attempt limit: the loop ends when a terminal snapshot
/// arrives, a probe fails, or `cfg.max_wait` of wall-clock time has passed.
/// No probe is issued once the budget is exhausted, and a probe failure is
/// fatal to the call (transport errors are never retried here).
///
/// Blocks the calling thread for its whole duration. Wait calls share no
/// state; run one per thread to watch several resources at once.
pub fn wait_until_done<P, F>(
    prober: &P,
    reference: &str,
    cfg: &WaitConfig,
    on_status: F,
) -> Result<PollResult, WaitError>
where
    P: StatusProber,
    F: FnMut(&PollResult, &WaitSession),
{
    wait_with_clock(&SystemClock, prober, reference, cfg, on_status)
}

fn wait_with_clock<C, P, F>(
    clock: &C,
    prober: &P,
    reference: &str,
    cfg: &WaitConfig,
    mut on_status: F,
) -> Result<PollResult, WaitError>
where
    C: Clock,
    P: StatusProber,
    F: FnMut(&PollResult, &WaitSession),
{
    let start = clock.now();
    let mut schedule = cfg.backoff.schedule();
    let mut probes = 0u64;

    loop {
        let result = prober.poll(reference)?;
        probes += 1;
        let next_delay = schedule.next_delay();
        let session = WaitSession {
            elapsed: clock.now().duration_since(start),
            next_delay,
            probes,
        };
        on_status(&result, &session);

        if !prober.is_not_done(&result) {
            tracing::debug!(
                "wait on {} reached {} after {} probes",
                reference,
                result.state,
                probes
            );
            return Ok(result);
        }

        let elapsed = clock.now().duration_since(start);
        if elapsed >= cfg.max_wait {
            return Err(timeout(reference, elapsed));
        }
        clock.sleep(next_delay);
        // The budget can run out mid-sleep; never probe past it.
        let elapsed = clock.now().duration_since(start);
        if elapsed >= cfg.max_wait {
            return Err(timeout(reference, elapsed));
        }
    }
}

fn timeout(reference: &str, waited: Duration) -> WaitError {
    WaitError::Timeout {
        reference: reference.to_string(),
        waited,
    }
}
