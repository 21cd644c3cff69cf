//! Per-call cancellation and deadline.
//!
//! Every ledger operation takes an [`OpContext`]. The caller can cancel it
//! through its [`CancellationToken`] or bound it with a deadline; either one
//! firing before commit makes the operation return
//! [`EngineError::Cancelled`] and rolls the transaction back.

use std::{future::Future, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, Default)]
pub struct OpContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl OpContext {
    /// A context that never expires and is not cancelled until
    /// [`OpContext::cancel`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Tie this context to an externally owned token, e.g. a request or
    /// shutdown token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `work` to completion unless the context is cancelled or its
    /// deadline elapses first. On early exit `work` is dropped.
    pub(crate) async fn run<T, F>(&self, work: F) -> ResultEngine<T>
    where
        F: Future<Output = ResultEngine<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(EngineError::Cancelled("operation cancelled".to_string()));
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(EngineError::Cancelled("deadline exceeded".to_string()));
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                Err(EngineError::Cancelled("operation cancelled".to_string()))
            }
            _ = expired => {
                Err(EngineError::Cancelled("deadline exceeded".to_string()))
            }
            result = work => result,
        }
    }
}
