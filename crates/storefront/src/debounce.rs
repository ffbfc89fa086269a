//! Search-input debouncing.
//!
//! Every keystroke in the search box is its own HTTP request. Each browser
//! session owns a [`Debouncer`]: a new request cancels whatever is still
//! waiting and starts a fresh quiet period. Only the request that survives
//! the quiet period calls the commerce API, so the API sees one search per
//! pause in typing, carrying the last value typed.
//!
//! A call that has already fired is not cancelled by later input.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use moka::sync::Cache;
use tokio::sync::oneshot;

/// How long an idle session keeps its debouncer.
const DEBOUNCER_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Upper bound on concurrently tracked sessions.
const MAX_TRACKED_SESSIONS: u64 = 10_000;

/// Coalesces bursts of calls into the last one.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    /// Cancels the call currently waiting out its delay, if any.
    pending: Mutex<Option<oneshot::Sender<()>>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// The quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `call` to run after the quiet period.
    ///
    /// Cancels the previously scheduled call. Returns `None` if this call is
    /// itself superseded before its delay elapses; the closure is then never
    /// invoked.
    pub async fn run<F, Fut, T>(&self, call: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(cancel_tx);
        if let Some(previous) = previous {
            // The receiver is gone if that call already fired
            let _ = previous.send(());
        }

        tokio::select! {
            () = tokio::time::sleep(self.delay) => {}
            _ = cancel_rx => {
                tracing::trace!("Debounced call superseded");
                return None;
            }
        }

        Some(call().await)
    }
}

/// Per-session debouncers for the product search box.
#[derive(Clone)]
pub struct SearchDebouncers {
    delay: Duration,
    sessions: Cache<String, Arc<Debouncer>>,
}

impl SearchDebouncers {
    /// Create an empty registry whose debouncers use `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_TRACKED_SESSIONS)
            .time_to_idle(DEBOUNCER_IDLE_TIMEOUT)
            .build();

        Self { delay, sessions }
    }

    /// Get the debouncer for a session key, creating it on first use.
    #[must_use]
    pub fn for_session(&self, key: &str) -> Arc<Debouncer> {
        let delay = self.delay;
        self.sessions
            .get_with(key.to_string(), || Arc::new(Debouncer::new(delay)))
    }
}
