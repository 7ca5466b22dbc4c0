//! The bounded-deadline loop primitive every polling operation uses.
//!
//! The budget is the cancellation signal: the loop observes it directly and
//! fails with a typed [`Timeout`], so callers never race a detached timer
//! against an unbounded retry.

use std::{
    future::Future,
    time::{Duration, Instant},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Budget {
    pub interval: Duration,
    pub deadline: Duration,
}

impl Budget {
    pub fn new(interval: Duration, deadline: Duration) -> Self {
        Self { interval, deadline }
    }

    /// The 500ms-interval budget the harness uses for daemon polling.
    pub fn within(deadline: Duration) -> Self {
        Self {
            interval: Duration::from_millis(500),
            deadline,
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("did not observe {subject} within {deadline:?}")]
pub struct Timeout {
    pub subject: String,
    pub deadline: Duration,
}

/// Repeatedly run `attempt` until it yields a value or the budget is spent.
///
/// A clean miss (`Ok(None)`) sleeps for the interval and retries; any error
/// is terminal and propagates immediately.
pub async fn until<T, F, Fut>(budget: Budget, subject: &str, mut attempt: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<Option<T>>>,
{
    let start = Instant::now();

    loop {
        if let Some(value) = attempt().await? {
            return Ok(value);
        }

        if start.elapsed() >= budget.deadline {
            return Err(Timeout {
                subject: subject.to_owned(),
                deadline: budget.deadline,
            }
            .into());
        }

        tokio::time::sleep(budget.interval).await;
    }
}
