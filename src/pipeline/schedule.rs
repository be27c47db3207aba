//! Poll scheduler: runs a detector once or on a fixed interval.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// One poll cycle of a detector.
#[async_trait]
pub trait Detector: Send {
    /// Short name for log lines.
    fn label(&self) -> &'static str;

    async fn poll(&mut self) -> Result<()>;
}

/// Whether to run a single cycle or keep polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Once,
    Loop { interval: Duration },
}

/// What to do when a cycle fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Stop and return the error.
    Propagate,
    /// Log the error and try again next cycle, up to an optional number of
    /// consecutive failures.
    Continue { max_consecutive_failures: Option<u32> },
}

impl RetryPolicy {
    /// `Continue` with `0` meaning unbounded.
    pub fn continue_up_to(max_consecutive_failures: u32) -> Self {
        RetryPolicy::Continue {
            max_consecutive_failures: (max_consecutive_failures > 0)
                .then_some(max_consecutive_failures),
        }
    }
}

/// Drive `detector` according to `mode` and `policy`.
///
/// In loop mode Ctrl-C is honoured between cycles and ends the run cleanly.
pub async fn run<D: Detector + ?Sized>(
    detector: &mut D,
    mode: RunMode,
    policy: RetryPolicy,
) -> Result<()> {
    let mut failures: u32 = 0;

    loop {
        match detector.poll().await {
            Ok(()) => failures = 0,
            Err(e) => match policy {
                RetryPolicy::Propagate => return Err(e),
                RetryPolicy::Continue {
                    max_consecutive_failures,
                } => {
                    failures += 1;
                    log::error!("{} check failed: {}", detector.label(), e);
                    if max_consecutive_failures.is_some_and(|max| failures >= max) {
                        log::error!(
                            "Giving up after {} consecutive failed {} checks",
                            failures,
                            detector.label()
                        );
                        return Err(e);
                    }
                }
            },
        }

        let interval = match mode {
            RunMode::Once => return Ok(()),
            RunMode::Loop { interval } => interval,
        };

        log::info!("Sleeping for {}...", describe(interval));
        if !sleep_or_shutdown(interval).await {
            log::info!("Exiting...");
            return Ok(());
        }
    }
}

/// Sleep for `interval`; false if interrupted by Ctrl-C.
async fn sleep_or_shutdown(interval: Duration) -> bool {
    let sleep = tokio::time::sleep(interval);
    tokio::pin!(sleep);

    tokio::select! {
        _ = &mut sleep => true,
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => false,
            Err(e) => {
                log::warn!("Cannot listen for Ctrl-C: {}", e);
                sleep.await;
                true
            }
        },
    }
}

/// `300s` -> `5 minute/s`, `3600s` -> `1 hour/s`.
fn describe(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 3600 && secs % 3600 == 0 {
        format!("{} hour/s", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{} minute/s", secs / 60)
    } else {
        format!("{} second/s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    /// Fails the first `fail_first` polls, then succeeds.
    struct Flaky {
        polls: u32,
        fail_first: u32,
    }

    #[async_trait]
    impl Detector for Flaky {
        fn label(&self) -> &'static str {
            "flaky"
        }

        async fn poll(&mut self) -> Result<()> {
            self.polls += 1;
            if self.polls <= self.fail_first {
                Err(AppError::validation("boom"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_once_runs_single_cycle() {
        let mut detector = Flaky {
            polls: 0,
            fail_first: 0,
        };
        run(&mut detector, RunMode::Once, RetryPolicy::Propagate)
            .await
            .unwrap();
        assert_eq!(detector.polls, 1);
    }

    #[tokio::test]
    async fn test_propagate_returns_first_error() {
        let mut detector = Flaky {
            polls: 0,
            fail_first: 5,
        };
        let mode = RunMode::Loop {
            interval: Duration::ZERO,
        };
        assert!(run(&mut detector, mode, RetryPolicy::Propagate).await.is_err());
        assert_eq!(detector.polls, 1);
    }

    #[tokio::test]
    async fn test_continue_swallows_error_in_single_run() {
        let mut detector = Flaky {
            polls: 0,
            fail_first: 1,
        };
        let policy = RetryPolicy::continue_up_to(0);
        assert!(run(&mut detector, RunMode::Once, policy).await.is_ok());
        assert_eq!(detector.polls, 1);
    }

    #[tokio::test]
    async fn test_continue_gives_up_after_bound() {
        let mut detector = Flaky {
            polls: 0,
            fail_first: 10,
        };
        let mode = RunMode::Loop {
            interval: Duration::ZERO,
        };
        let policy = RetryPolicy::continue_up_to(3);
        assert!(run(&mut detector, mode, policy).await.is_err());
        assert_eq!(detector.polls, 3);
    }

    #[test]
    fn test_continue_up_to_zero_is_unbounded() {
        assert_eq!(
            RetryPolicy::continue_up_to(0),
            RetryPolicy::Continue {
                max_consecutive_failures: None
            }
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(Duration::from_secs(300)), "5 minute/s");
        assert_eq!(describe(Duration::from_secs(3600)), "1 hour/s");
        assert_eq!(describe(Duration::from_secs(45)), "45 second/s");
    }
}
