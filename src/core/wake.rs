//! Single-slot, auto-clearing wake signal.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Wakes the worker when work is enqueued.
///
/// A `pending` flag guarded by a mutex backs the condvar, so a `set` that
/// lands before the worker starts waiting is not lost. Any number of `set`
/// calls before a wait coalesce into one wake, and every successful wait
/// clears the flag.
#[derive(Debug, Default)]
pub struct WakeSignal {
    pending: Mutex<bool>,
    condvar: Condvar,
}

impl WakeSignal {
    /// Create an unsignaled wake signal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Mark a wake as pending and release the waiter, if any.
    pub fn set(&self) {
        let mut pending = self.pending.lock();
        *pending = true;
        drop(pending);
        self.condvar.notify_one();
    }

    /// Block until signaled, then clear the signal.
    pub fn wait(&self) {
        let mut pending = self.pending.lock();
        while !*pending {
            self.condvar.wait(&mut pending);
        }
        *pending = false;
    }

    /// Block until signaled or `timeout` elapses.
    ///
    /// Returns `true` if a signal was consumed, `false` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut pending = self.pending.lock();
        while !*pending {
            let timed_out = match deadline {
                Some(deadline) => self.condvar.wait_until(&mut pending, deadline).timed_out(),
                None => {
                    self.condvar.wait(&mut pending);
                    false
                }
            };
            if timed_out {
                break;
            }
        }
        std::mem::replace(&mut *pending, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_set_before_wait_is_not_lost() {
        let signal = WakeSignal::new();
        signal.set();
        signal.wait();
        assert!(!signal.wait_timeout(Duration::ZERO));
    }

    #[test]
    fn test_signals_coalesce() {
        let signal = WakeSignal::new();
        signal.set();
        signal.set();
        signal.set();
        assert!(signal.wait_timeout(Duration::from_millis(10)));
        assert!(!signal.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn test_wait_timeout_elapses() {
        let signal = WakeSignal::new();
        let start = Instant::now();
        assert!(!signal.wait_timeout(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_zero_timeout_returns_immediately() {
        let signal = WakeSignal::new();
        assert!(!signal.wait_timeout(Duration::ZERO));
        signal.set();
        assert!(signal.wait_timeout(Duration::ZERO));
    }

    #[test]
    fn test_set_interrupts_timed_wait() {
        let signal = Arc::new(WakeSignal::new());
        let setter = Arc::clone(&signal);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            setter.set();
        });

        let start = Instant::now();
        assert!(signal.wait_timeout(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();
    }
}
