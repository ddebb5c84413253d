//! Deadline watchdog: race an operation against a timer
//!
//! Every probe in this crate goes through [`execute`]: the operation runs on
//! its own thread while the caller waits on a `select!` between the
//! operation's result channel and a `crossbeam_channel::after` deadline
//! timer. Exactly one of the two arms wins, so a call produces exactly one
//! of {operation result, `ProbeError::Timeout`}.
//!
//! Cancellation is cooperative. The operation receives a [`CancelToken`] and
//! is expected to check it at its suspension points (between directory entry
//! reads, between stat and prefix read). When the deadline wins, the token
//! flips and the operation thread unwinds normally at its next checkpoint,
//! dropping whatever handles it opened. The watchdog never blocks past the
//! decision waiting for a stuck thread: a thread parked inside an
//! uninterruptible OS call exits when the kernel finally returns, and its
//! late result lands on a disconnected channel.

use crate::error::{ProbeError, ProbeResult};
use crossbeam_channel::{after, bounded, select};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Cooperative cancellation flag handed to watchdogged operations
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the watchdog has decided against this operation
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

/// Run `op` with a wall-clock deadline.
///
/// Returns the operation's own result (success or OS error) if it finishes
/// first, or `Err(ProbeError::Timeout)` if the deadline expires first. The
/// decision is made exactly once: if both events are observed in the same
/// scheduling tick, completed work wins and the timer's cancellation request
/// becomes a no-op.
///
/// A panic inside `op` is resumed on the calling thread.
pub fn execute<T, F>(op: F, deadline: Duration) -> ProbeResult<T>
where
    T: Send + 'static,
    F: FnOnce(&CancelToken) -> ProbeResult<T> + Send + 'static,
{
    let token = CancelToken::new();
    let op_token = token.clone();
    let (result_tx, result_rx) = bounded::<ProbeResult<T>>(1);

    let handle = thread::Builder::new()
        .name("watchdog-op".to_string())
        .spawn(move || {
            // A failed send means the verdict was already Timeout and the
            // receiver is gone; the result is discarded by contract.
            let _ = result_tx.send(op(&op_token));
        })
        .map_err(|e| ProbeError::from_io(&e))?;

    select! {
        recv(result_rx) -> outcome => match outcome {
            Ok(result) => {
                let _ = handle.join();
                result
            }
            // Channel disconnected without a value: the operation panicked.
            Err(_) => match handle.join() {
                Ok(()) => Err(ProbeError::Os { code: libc::EIO }),
                Err(payload) => panic::resume_unwind(payload),
            },
        },
        recv(after(deadline)) -> _ => {
            // Deadline expired. Drain once before declaring Timeout so a
            // result that arrived in the same tick still wins.
            if let Ok(result) = result_rx.try_recv() {
                let _ = handle.join();
                return result;
            }
            token.cancel();
            drop(result_rx);
            drop(handle);
            Err(ProbeError::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::time::Instant;

    #[test]
    fn test_fast_operation_wins() {
        let result = execute(|_| Ok(42u32), Duration::from_millis(500));
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn test_operation_error_passes_through() {
        let result: ProbeResult<()> = execute(
            |_| Err(ProbeError::Os { code: libc::ENOENT }),
            Duration::from_millis(500),
        );
        assert_eq!(result, Err(ProbeError::Os { code: libc::ENOENT }));
    }

    #[test]
    fn test_slow_operation_times_out() {
        let start = Instant::now();
        let result = execute(
            |_| {
                thread::sleep(Duration::from_millis(400));
                Ok(1u32)
            },
            Duration::from_millis(30),
        );
        assert_eq!(result, Err(ProbeError::Timeout));
        // The watchdog must return at the deadline, not when the operation
        // eventually finishes.
        assert!(start.elapsed() < Duration::from_millis(300));
    }

    #[test]
    fn test_zero_deadline_times_out_slow_op() {
        let result = execute(
            |_| {
                thread::sleep(Duration::from_millis(100));
                Ok(1u32)
            },
            Duration::ZERO,
        );
        assert_eq!(result, Err(ProbeError::Timeout));
    }

    #[test]
    fn test_cancellation_runs_cleanup() {
        struct CleanupFlag(Arc<AtomicBool>);
        impl Drop for CleanupFlag {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let cleaned = Arc::new(AtomicBool::new(false));
        let op_cleaned = Arc::clone(&cleaned);
        let observed_cancel = Arc::new(AtomicBool::new(false));
        let op_observed = Arc::clone(&observed_cancel);

        let result = execute(
            move |token| {
                let _guard = CleanupFlag(op_cleaned);
                thread::sleep(Duration::from_millis(100));
                if token.is_cancelled() {
                    op_observed.store(true, Ordering::SeqCst);
                    return Err(ProbeError::Timeout);
                }
                Ok(())
            },
            Duration::from_millis(20),
        );
        assert_eq!(result, Err(ProbeError::Timeout));

        // The detached operation reaches its checkpoint, sees the token, and
        // drops its guard on the way out.
        thread::sleep(Duration::from_millis(300));
        assert!(observed_cancel.load(Ordering::SeqCst));
        assert!(cleaned.load(Ordering::SeqCst));
    }

    #[test]
    fn test_exactly_one_outcome_under_contention() {
        // Deadline and completion land close together; each call must still
        // produce exactly one verdict.
        for _ in 0..20 {
            let result = execute(
                |_| {
                    thread::sleep(Duration::from_millis(10));
                    Ok(7u32)
                },
                Duration::from_millis(10),
            );
            match result {
                Ok(7) | Err(ProbeError::Timeout) => {}
                other => panic!("unexpected verdict: {other:?}"),
            }
        }
    }
}
