use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use super::error::BlocklistError;

/// Request-scoped deadline and cancellation signal.
///
/// The service checks the context before every store operation. A store
/// operation that has already started always runs to completion, so an
/// expired context never leaves a half-applied mutation behind.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl RequestContext {
    /// A context that never expires.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancelled: Arc::default(),
        }
    }

    /// Marks this context, and every clone of it, as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_done(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Fails with [`BlocklistError::Cancelled`] once the context is done.
    pub fn check(&self) -> Result<(), BlocklistError> {
        if self.is_done() {
            return Err(BlocklistError::Cancelled);
        }
        Ok(())
    }
}
