//! Cancellation and deadline carried through core operations

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use utena_utils::{Result, UtenaError};

/// Per-request cancellation token plus optional deadline
///
/// Request contexts are derived from the daemon's root context, so cancelling
/// the root (on shutdown) cancels every in-flight request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A fresh context with no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a child context; cancelling `self` cancels the child
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a child context that expires after `timeout`
    ///
    /// An earlier inherited deadline is kept.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut child = self.child();
        let candidate = Instant::now() + timeout;
        child.deadline = Some(match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        });
        child
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once this context is cancelled
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The earlier of this context's deadline and `now + limit`
    pub fn deadline_within(&self, limit: Duration) -> Instant {
        let bound = Instant::now() + limit;
        match self.deadline {
            Some(deadline) if deadline < bound => deadline,
            _ => bound,
        }
    }

    /// Fail if the context was cancelled or its deadline passed
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(UtenaError::Cancelled("request cancelled".into()));
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(UtenaError::Cancelled("deadline exceeded".into()));
            }
        }
        Ok(())
    }
}
