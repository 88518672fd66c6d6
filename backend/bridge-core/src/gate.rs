//! Latest-call-wins gating for expensive operations.
//!
//! Every call takes a ticket under the admission lock, then queues on the
//! execution lock. When a call finally holds the execution lock it runs only
//! if no newer call was admitted in the meantime; otherwise it returns the
//! gate's default value untouched. A running body is never interrupted, and a
//! call admitted after the check runs once the current holder finishes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;

#[derive(Debug)]
pub struct CallGate<T> {
    name: String,
    default: T,
    admission: Mutex<u64>,
    execution: Mutex<()>,
}

impl<T: Clone> CallGate<T> {
    pub fn new(name: impl Into<String>, default: T) -> Self {
        Self {
            name: name.into(),
            default,
            admission: Mutex::new(0),
            execution: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run<E>(&self, body: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let ticket = self.admit();
        let _running = self.lock_execution();

        let current = self.current_ticket();
        if ticket != current {
            debug!(
                "Call {ticket} to '{}' superseded by call {current}",
                self.name
            );
            return Ok(self.default.clone());
        }

        body()
    }

    fn admit(&self) -> u64 {
        let mut counter = self.admission.lock().unwrap_or_else(PoisonError::into_inner);
        *counter += 1;
        *counter
    }

    pub(crate) fn current_ticket(&self) -> u64 {
        *self.admission.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A panicking body poisons the lock; the next caller takes it over.
    pub(crate) fn lock_execution(&self) -> MutexGuard<'_, ()> {
        self.execution.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
