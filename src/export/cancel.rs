use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

use crate::foundation::error::{StippleError, StippleResult};

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cooperative cancellation shared between an export and whoever may stop it.
///
/// Clones observe the same flag. The exporter checks it at every suspension point and wakes from
/// pacing and flush sleeps as soon as it is set.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancelled.
    pub fn check(&self) -> StippleResult<()> {
        if self.is_cancelled() {
            Err(StippleError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Drive `fut` unless the token fires first.
    pub async fn run<F: Future>(&self, fut: F) -> StippleResult<F::Output> {
        self.check()?;
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(StippleError::Cancelled),
            out = fut => Ok(out),
        }
    }

    /// Sleep for `dur`, waking early with `Err(Cancelled)` if cancelled.
    pub async fn sleep(&self, dur: Duration) -> StippleResult<()> {
        self.run(tokio::time::sleep(dur)).await
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/cancel.rs"]
mod tests;
