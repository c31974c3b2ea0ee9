//! Cancellable debounce timer for search and filter input
//!
//! Each [`Debouncer::schedule`] call cancels the previously scheduled action.
//! Only the last action within the quiet period runs.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` after the quiet period unless rescheduled or cancelled.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn schedule<F, Fut>(&mut self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action().await;
        }));
    }

    /// Abort the scheduled action; returns true if one was still waiting
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Wait for the scheduled action, if any, to finish running
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            // a cancelled task has nothing left to wait for
            let _ = handle.await;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_only_last_action_runs() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new(Duration::from_millis(30));

        for query in ["n", "no", "nod"] {
            let seen = Arc::clone(&seen);
            debouncer.schedule(move || async move {
                seen.lock().unwrap().push(query.to_string());
            });
        }
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(*seen.lock().unwrap(), vec!["nod".to_string()]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test]
    async fn test_cancel_prevents_run() {
        let seen = Arc::new(Mutex::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(30));
        let counter = Arc::clone(&seen);
        debouncer.schedule(move || async move {
            *counter.lock().unwrap() += 1;
        });
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_settle_waits_for_last_action() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new(Duration::from_millis(20));
        for query in ["cr", "crust"] {
            let seen = Arc::clone(&seen);
            debouncer.schedule(move || async move {
                seen.lock().unwrap().push(query);
            });
        }

        debouncer.settle().await;
        assert_eq!(*seen.lock().unwrap(), vec!["crust"]);
        assert!(!debouncer.is_pending());

        // nothing scheduled returns immediately
        debouncer.settle().await;
    }
}
