//! service/event.rs
//! One-shot completion event.
//!
//! Starts unset, is set at most once and never reset. Any number of threads
//! may poll or block on it.
use std::sync::{Condvar, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct CompletionEvent {
    signaled: Mutex<bool>,
    cvar: Condvar,
}

impl CompletionEvent {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // A bool cannot be left half-written, so a poisoned flag is still valid
        self.signaled.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Set the event and wake every waiter.
    /// Returns `false` if it was already set (the call is then a no-op).
    pub fn signal(&self) -> bool {
        let mut signaled = self.lock();
        if *signaled {
            return false;
        }
        *signaled = true;
        self.cvar.notify_all();
        true
    }

    /// Non-blocking check.
    pub fn is_signaled(&self) -> bool {
        *self.lock()
    }

    /// Block until the event is set.
    pub fn wait(&self) {
        let mut signaled = self.lock();
        while !*signaled {
            signaled = self.cvar.wait(signaled).unwrap_or_else(|p| p.into_inner());
        }
    }
}
