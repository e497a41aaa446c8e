use core::sync::atomic::{AtomicBool, Ordering};

use crate::{CodecError, ErrorCode};

/// A cooperative cancellation signal.
pub trait Cancellation {
    /// Returns true once cancellation has been requested.
    fn is_cancelled(&self) -> bool;
}

/// A signal that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<C: Cancellation + ?Sized> Cancellation for &C {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Amortizes cancellation checks: the signal is polled only after `threshold` bytes have
/// been processed since the previous poll.
#[derive(Debug, Clone)]
pub struct CancellationGate {
    threshold: usize,
    since_check: usize,
}

impl CancellationGate {
    /// Construct a gate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `threshold` is zero.
    pub const fn new(threshold: usize) -> Result<Self, CodecError> {
        if threshold == 0 {
            return Err(CodecError::invalid_argument());
        }
        Ok(Self {
            threshold,
            since_check: 0,
        })
    }

    /// Account for `bytes` processed and poll `signal` if the threshold was crossed.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` at `position` if the signal fired.
    pub fn advance<C: Cancellation + ?Sized>(
        &mut self,
        bytes: usize,
        signal: &C,
        position: usize,
    ) -> Result<(), CodecError> {
        self.since_check = self.since_check.saturating_add(bytes);
        if self.since_check < self.threshold {
            return Ok(());
        }
        self.since_check = 0;
        if signal.is_cancelled() {
            codec_debug!(position, "cancellation observed");
            return Err(CodecError::new(ErrorCode::Cancelled, position));
        }
        Ok(())
    }
}
