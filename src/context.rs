//! Per-task deadline and cancellation.
//!
//! Every outbound call made while serving a task goes through
//! [`TaskContext::run`], so it is bounded by the task deadline and aborted as
//! soon as the host cancels the task.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    #[error("deadline exceeded")]
    DeadlineExceeded,
    #[error("task cancelled")]
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct TaskContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl TaskContext {
    pub fn new(deadline: Instant, cancel: CancellationToken) -> Self {
        Self { deadline, cancel }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Instant::now() + timeout, CancellationToken::new())
    }

    /// Derive a context that expires no later than `self` and is cancelled
    /// together with it.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = self.deadline.min(Instant::now() + timeout);
        Self::new(deadline, self.cancel.child_token())
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `fut` to completion unless the deadline passes or the task is
    /// cancelled first. The future is dropped on interruption.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interrupted::Cancelled),
            res = tokio::time::timeout_at(self.deadline, fut) => {
                res.map_err(|_| Interrupted::DeadlineExceeded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes_before_deadline() {
        let ctx = TaskContext::with_timeout(Duration::from_secs(5));
        let out = ctx.run(async { 42 }).await;
        assert_eq!(out, Ok(42));
    }

    #[tokio::test]
    async fn test_run_hits_deadline() {
        let ctx = TaskContext::with_timeout(Duration::from_millis(20));
        let out = ctx.run(std::future::pending::<()>()).await;
        assert_eq!(out, Err(Interrupted::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_parent_cancel_reaches_child() {
        let parent = TaskContext::with_timeout(Duration::from_secs(5));
        let child = parent.child_with_timeout(Duration::from_secs(60));
        assert!(child.deadline() <= parent.deadline());

        parent.cancel();
        assert!(child.is_cancelled());
        let out = child.run(std::future::pending::<()>()).await;
        assert_eq!(out, Err(Interrupted::Cancelled));
    }
}
