//! Delay sequences between probes.

use rand::Rng;
use std::time::Duration;

/// How successive probe delays are generated.
///
/// `Exponential` grows each delay from the previous one and adds a uniform
/// random offset in `[0, jitter]` so concurrent waiters drift apart; the
/// offset is only ever added, never subtracted. `Fixed` replays a literal
/// sequence and holds at its last value once exhausted.
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffPolicy {
    /// `delay[0] = base`, `delay[n] = min(delay[n-1] * multiplier + U[0, jitter], ceiling)`.
    Exponential {
        base: Duration,
        multiplier: f64,
        jitter: Duration,
        ceiling: Duration,
    },
    /// Replay `delays` in order, repeating the last entry forever.
    Fixed { delays: Vec<Duration> },
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        BackoffPolicy::Exponential {
            base: Duration::from_secs(2),
            multiplier: 1.4,
            jitter: Duration::from_secs(1),
            ceiling: Duration::from_secs(180),
        }
    }
}

impl BackoffPolicy {
    /// Starts a fresh delay sequence for one wait call.
    pub fn schedule(&self) -> Schedule {
        Schedule {
            policy: self.clone(),
            prev: None,
            index: 0,
        }
    }
}

/// One wait call's position in the delay sequence.
///
/// The sequence is infinite; deciding when to stop is the wait loop's job.
#[derive(Debug, Clone)]
pub struct Schedule {
    policy: BackoffPolicy,
    prev: Option<Duration>,
    index: usize,
}

impl Schedule {
    /// Next delay in the sequence.
    pub fn next_delay(&mut self) -> Duration {
        let next = match &self.policy {
            BackoffPolicy::Exponential {
                base,
                multiplier,
                jitter,
                ceiling,
            } => {
                let raw = match self.prev {
                    None => *base,
                    Some(prev) => grown(prev, *multiplier).saturating_add(sample_jitter(*jitter)),
                };
                raw.min(*ceiling)
            }
            BackoffPolicy::Fixed { delays } => delays
                .get(self.index)
                .or_else(|| delays.last())
                .copied()
                .unwrap_or(Duration::ZERO),
        };
        self.index += 1;
        self.prev = Some(next);
        next
    }
}

/// `prev * multiplier` without `mul_f64`'s panics on pathological multipliers.
fn grown(prev: Duration, multiplier: f64) -> Duration {
    Duration::try_from_secs_f64(prev.as_secs_f64() * multiplier).unwrap_or(Duration::MAX)
}

/// Uniform sample from `[0, jitter]`, at millisecond granularity.
fn sample_jitter(jitter: Duration) -> Duration {
    let max_ms = jitter.as_millis().min(u64::MAX as u128) as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delay_is_base() {
        let policy = BackoffPolicy::Exponential {
            base: Duration::from_secs(2),
            multiplier: 1.4,
            jitter: Duration::from_secs(1),
            ceiling: Duration::from_secs(180),
        };
        assert_eq!(policy.schedule().next_delay(), Duration::from_secs(2));
    }

    #[test]
    fn delays_stay_within_growth_bounds() {
        let jitter = Duration::from_millis(500);
        let ceiling = Duration::from_secs(60);
        let policy = BackoffPolicy::Exponential {
            base: Duration::from_millis(100),
            multiplier: 2.0,
            jitter,
            ceiling,
        };
        let mut schedule = policy.schedule();
        let mut prev = schedule.next_delay();
        assert_eq!(prev, Duration::from_millis(100));
        for _ in 0..10 {
            let d = schedule.next_delay();
            let low = prev.mul_f64(2.0).min(ceiling);
            let high = (prev.mul_f64(2.0) + jitter).min(ceiling);
            assert!(d >= low, "{:?} below {:?}", d, low);
            assert!(d <= high, "{:?} above {:?}", d, high);
            assert!(d <= ceiling);
            prev = d;
        }
    }

    #[test]
    fn ceiling_caps_every_delay() {
        let policy = BackoffPolicy::Exponential {
            base: Duration::from_millis(100),
            multiplier: 10.0,
            jitter: Duration::ZERO,
            ceiling: Duration::from_secs(1),
        };
        let mut schedule = policy.schedule();
        assert_eq!(schedule.next_delay(), Duration::from_millis(100));
        assert_eq!(schedule.next_delay(), Duration::from_secs(1));
        assert_eq!(schedule.next_delay(), Duration::from_secs(1));
    }

    #[test]
    fn zero_jitter_flat_multiplier_is_constant() {
        let policy = BackoffPolicy::Exponential {
            base: Duration::from_millis(1000),
            multiplier: 1.0,
            jitter: Duration::ZERO,
            ceiling: Duration::from_secs(180),
        };
        let mut schedule = policy.schedule();
        for _ in 0..5 {
            assert_eq!(schedule.next_delay(), Duration::from_millis(1000));
        }
    }

    #[test]
    fn fixed_replays_then_holds_last() {
        let policy = BackoffPolicy::Fixed {
            delays: vec![
                Duration::from_millis(10),
                Duration::from_millis(20),
                Duration::from_millis(30),
            ],
        };
        let mut schedule = policy.schedule();
        assert_eq!(schedule.next_delay(), Duration::from_millis(10));
        assert_eq!(schedule.next_delay(), Duration::from_millis(20));
        assert_eq!(schedule.next_delay(), Duration::from_millis(30));
        assert_eq!(schedule.next_delay(), Duration::from_millis(30));
        assert_eq!(schedule.next_delay(), Duration::from_millis(30));
    }

    #[test]
    fn empty_fixed_sequence_yields_zero() {
        let mut schedule = BackoffPolicy::Fixed { delays: vec![] }.schedule();
        assert_eq!(schedule.next_delay(), Duration::ZERO);
        assert_eq!(schedule.next_delay(), Duration::ZERO);
    }

    #[test]
    fn default_policy_values() {
        match BackoffPolicy::default() {
            BackoffPolicy::Exponential {
                base,
                multiplier,
                jitter,
                ceiling,
            } => {
                assert_eq!(base, Duration::from_secs(2));
                assert!((multiplier - 1.4).abs() < 1e-9);
                assert_eq!(jitter, Duration::from_secs(1));
                assert_eq!(ceiling, Duration::from_secs(180));
            }
            BackoffPolicy::Fixed { .. } => panic!("default should be exponential"),
        }
    }

    #[test]
    fn schedules_are_independent_per_call() {
        let policy = BackoffPolicy::Exponential {
            base: Duration::from_millis(100),
            multiplier: 2.0,
            jitter: Duration::ZERO,
            ceiling: Duration::from_secs(60),
        };
        let mut first = policy.schedule();
        first.next_delay();
        first.next_delay();
        // A later call starts over at the base delay.
        assert_eq!(policy.schedule().next_delay(), Duration::from_millis(100));
    }
}
