use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(test)]
use std::sync::atomic::AtomicUsize;

use snafu::Snafu;

/// Cooperative cancellation signal shared between a caller and a long running
/// tree operation.
///
/// Clones share the same flag. Operations poll it at iteration boundaries and
/// stop with [`CancellationError::Cancelled`] once it is raised.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
    #[cfg(test)]
    checks_left: Option<Arc<AtomicUsize>>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Flag that raises itself on the `checks`-th call to [`Self::check`]
    #[cfg(test)]
    pub(crate) fn cancelled_on_check(checks: usize) -> Self {
        Self {
            checks_left: Some(Arc::new(AtomicUsize::new(checks))),
            ..Self::default()
        }
    }

    pub fn check(&self) -> Result<(), CancellationError> {
        #[cfg(test)]
        self.count_check();
        if self.is_cancelled() {
            Err(CancellationError::Cancelled)
        } else {
            Ok(())
        }
    }

    #[cfg(test)]
    fn count_check(&self) {
        let Some(checks_left) = &self.checks_left else {
            return;
        };
        let previous =
            checks_left.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if previous == Ok(1) {
            self.cancel();
        }
    }
}

#[derive(Debug, Snafu)]
pub enum CancellationError {
    #[snafu(display("Operation was cancelled"))]
    Cancelled,
}
