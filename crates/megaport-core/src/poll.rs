// ── Polling state machine ──
//
// Waits for an eventually consistent remote state: a grace delay after the
// submission, then one probe per interval until the probe is satisfied or
// the deadline passes. Transient errors are retried, everything else ends
// the wait.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, warn};

use crate::config::PollPolicy;
use crate::error::CoreError;
use crate::model::{ProductUid, ProvisioningStatus};

/// Floor on the delay between two probes, whatever the policy says.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Result of a single probe.
#[derive(Debug)]
pub(crate) enum Step<T> {
    Ready(T),
    /// Not there yet; carries the status seen, if any.
    Pending(Option<ProvisioningStatus>),
}

/// One wait with a fixed deadline, shared by every stage of an operation.
pub(crate) struct Poller {
    uid: ProductUid,
    interval: Duration,
    deadline: Instant,
    last_status: Option<ProvisioningStatus>,
}

impl Poller {
    /// Start the clock and sit out the initial grace delay.
    pub(crate) async fn start(uid: ProductUid, policy: &PollPolicy) -> Self {
        let deadline = Instant::now() + policy.timeout;
        sleep(policy.initial_delay.min(policy.timeout)).await;
        Self {
            uid,
            interval: policy.interval.max(MIN_POLL_INTERVAL),
            deadline,
            last_status: None,
        }
    }

    /// Probe until ready, failing with `Timeout` once the deadline passes.
    pub(crate) async fn until<T, F, Fut>(&mut self, stage: &str, mut probe: F) -> Result<T, CoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Step<T>, CoreError>>,
    {
        loop {
            match probe().await {
                Ok(Step::Ready(value)) => return Ok(value),
                Ok(Step::Pending(status)) => {
                    debug!(uid = %self.uid, stage, status = ?status, "still waiting");
                    if status.is_some() {
                        self.last_status = status;
                    }
                }
                Err(e) if e.is_transient() => {
                    warn!(uid = %self.uid, stage, error = %e, "transient error while polling, retrying");
                }
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= self.deadline {
                return Err(CoreError::Timeout {
                    uid: self.uid.clone(),
                    last_status: self.last_status.clone(),
                });
            }
            sleep_until((now + self.interval).min(self.deadline)).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn policy() -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_secs(5),
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(60),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ready_after_pending_probes() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();
        let mut poller = Poller::start(ProductUid::from("p-1"), &policy()).await;

        let value = poller
            .until("ready", || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Ok(Step::Pending(Some(ProvisioningStatus::Deployable)))
                } else {
                    Ok(Step::Ready(n))
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 2);
        // 5s grace + two 10s intervals.
        assert_eq!(started.elapsed(), Duration::from_secs(25));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_still_waits_the_floor() {
        let calls = AtomicU32::new(0);
        let policy = PollPolicy {
            initial_delay: Duration::ZERO,
            interval: Duration::ZERO,
            timeout: Duration::from_secs(60),
        };
        let started = Instant::now();
        let mut poller = Poller::start(ProductUid::from("p-5"), &policy).await;

        poller
            .until("ready", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Ok(Step::Pending(None))
                } else {
                    Ok(Step::Ready(()))
                }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), MIN_POLL_INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_with_last_status() {
        let mut poller = Poller::start(ProductUid::from("p-2"), &policy()).await;
        let result: Result<(), _> = poller
            .until("ready", || async {
                Ok(Step::Pending(Some(ProvisioningStatus::Deployable)))
            })
            .await;

        assert!(matches!(
            result,
            Err(CoreError::Timeout {
                last_status: Some(ProvisioningStatus::Deployable),
                ..
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_are_retried() {
        let calls = AtomicU32::new(0);
        let mut poller = Poller::start(ProductUid::from("p-3"), &policy()).await;
        let value = poller
            .until("ready", || async {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(CoreError::Transport {
                        message: "connection reset".into(),
                    })
                } else {
                    Ok(Step::Ready("done"))
                }
            })
            .await
            .unwrap();
        assert_eq!(value, "done");
    }

    #[tokio::test(start_paused = true)]
    async fn remote_errors_are_fatal() {
        let calls = AtomicU32::new(0);
        let mut poller = Poller::start(ProductUid::from("p-4"), &policy()).await;
        let result: Result<(), _> = poller
            .until("ready", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(CoreError::Remote {
                    status: Some(500),
                    message: "boom".into(),
                })
            })
            .await;
        assert!(matches!(result, Err(CoreError::Remote { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
