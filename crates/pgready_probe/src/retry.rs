use crate::{Probe, ProbeError};
use std::time::Duration;

/// A simple retry policy with a fixed pause between attempts.
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Probe until the target is ready or attempts run out.
    ///
    /// Returns `Ok(true)` on readiness, `Ok(false)` when all attempts
    /// were exhausted by retryable failures, and `Err` as soon as a
    /// non-retryable error occurs. No pause follows the final attempt,
    /// so an exhausted run sleeps exactly `max_attempts - 1` times.
    pub async fn wait_until_ready(&self, probe: &dyn Probe) -> Result<bool, ProbeError> {
        let target = probe.describe();
        for attempt in 1..=self.max_attempts {
            match probe.check().await {
                Ok(()) => {
                    tracing::info!("{target} is ready!");
                    return Ok(true);
                }
                Err(e) if e.is_retryable() => {
                    tracing::info!("Waiting for {target}... (attempt {attempt}/{})", self.max_attempts);
                    tracing::debug!(error = %e, "probe attempt failed");
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.interval).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
        tracing::error!("Failed to connect to {target}");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` checks with a retryable error, then
    /// succeeds (or fails fatally when `fatal` is set).
    struct ScriptedProbe {
        failures: u32,
        fatal: bool,
        calls: AtomicU32,
    }

    impl ScriptedProbe {
        fn failing_times(failures: u32) -> Self {
            Self {
                failures,
                fatal: false,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Probe for ScriptedProbe {
        async fn check(&self) -> Result<(), ProbeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                Err(ProbeError::Unreachable("connection refused".into()))
            } else if self.fatal {
                Err(ProbeError::Database("relation does not exist".into()))
            } else {
                Ok(())
            }
        }

        fn describe(&self) -> String {
            "PostgreSQL".into()
        }
    }

    #[tokio::test]
    async fn ready_on_first_attempt() {
        let probe = ScriptedProbe::failing_times(0);
        let policy = RetryPolicy {
            max_attempts: 3,
            interval: Duration::from_secs(2),
        };
        let ready = policy.wait_until_ready(&probe).await.expect("no fatal error");
        assert!(ready);
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ready_after_retries_pauses_between_attempts() {
        let probe = ScriptedProbe::failing_times(2);
        let policy = RetryPolicy {
            max_attempts: 5,
            interval: Duration::from_secs(2),
        };
        let started = tokio::time::Instant::now();
        let ready = policy.wait_until_ready(&probe).await.expect("no fatal error");
        assert!(ready);
        assert_eq!(probe.calls(), 3);
        // 2 failures -> 2 pauses of 2s each
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_after_max_attempts_without_trailing_pause() {
        let probe = ScriptedProbe::failing_times(u32::MAX);
        let policy = RetryPolicy {
            max_attempts: 4,
            interval: Duration::from_secs(2),
        };
        let started = tokio::time::Instant::now();
        let ready = policy.wait_until_ready(&probe).await.expect("no fatal error");
        assert!(!ready);
        assert_eq!(probe.calls(), 4);
        // no sleep after the last attempt
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_failure_never_pauses() {
        let probe = ScriptedProbe::failing_times(u32::MAX);
        let policy = RetryPolicy {
            max_attempts: 1,
            interval: Duration::from_secs(60),
        };
        let started = tokio::time::Instant::now();
        let ready = policy.wait_until_ready(&probe).await.expect("no fatal error");
        assert!(!ready);
        assert_eq!(probe.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn fatal_error_propagates_immediately() {
        let probe = ScriptedProbe {
            failures: 0,
            fatal: true,
            calls: AtomicU32::new(0),
        };
        let policy = RetryPolicy {
            max_attempts: 10,
            interval: Duration::from_secs(2),
        };
        let res = policy.wait_until_ready(&probe).await;
        assert!(matches!(res, Err(ProbeError::Database(_))));
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_error_after_retryable_failures_stops_the_loop() {
        let probe = ScriptedProbe {
            failures: 2,
            fatal: true,
            calls: AtomicU32::new(0),
        };
        let policy = RetryPolicy {
            max_attempts: 10,
            interval: Duration::from_secs(1),
        };
        let res = policy.wait_until_ready(&probe).await;
        assert!(matches!(res, Err(ProbeError::Database(_))));
        assert_eq!(probe.calls(), 3);
    }
}
