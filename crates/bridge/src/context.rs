// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-request cancellation scope for remote calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;

/// Cancellation and deadline carried by one inbound request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub cancel: CancellationToken,
    pub deadline: Instant,
    /// Identity of the calling user, when the frontend supplies one.
    pub caller: Option<String>,
}

impl RequestContext {
    /// Create a context that is cancelled with `parent` and expires after `timeout`.
    pub fn new(parent: &CancellationToken, timeout: Duration, caller: Option<String>) -> Self {
        Self { cancel: parent.child_token(), deadline: Instant::now() + timeout, caller }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive a remote call to completion unless the context ends first.
    ///
    /// The remote future is dropped on cancellation or deadline, which aborts
    /// the in-flight request.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, DispatchError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DispatchError::Cancelled),
            res = tokio::time::timeout_at(self.deadline, fut) => match res {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(DispatchError::Remote(e)),
                Err(_) => Err(DispatchError::TimedOut),
            },
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
