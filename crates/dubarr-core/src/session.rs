//! Supersession of running searches
//!
//! Every keystroke starts a new search. [`SearchSession`] makes sure only
//! the newest one keeps running: starting a search cancels the previous one
//! if it has not finished yet, without waiting for it to unwind.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Default)]
struct Slot {
    current: Option<AbortHandle>,
    generation: u64,
}

/// Holds the single currently executing search.
///
/// Each call to [`SearchSession::run`] is numbered with a generation. A
/// search should only publish its results while
/// [`SearchSession::is_current`] still holds for its generation, since
/// cancellation only takes effect at the cancelled task's next `.await`.
///
/// Cloning a session yields another handle to the same slot.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    slot: Arc<Mutex<Slot>>,
}

impl SearchSession {
    /// Create a session with no search running
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new search, cancelling the previous one if it is still running.
    ///
    /// `search` receives the generation assigned to this run.
    pub fn run<F, Fut>(&self, search: F) -> SearchHandle<Fut::Output>
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        let mut slot = self.slot();
        if let Some(previous) = slot.current.take() {
            if !previous.is_finished() {
                debug!(generation = slot.generation, "superseding running search");
                previous.abort();
            }
        }

        slot.generation += 1;
        let generation = slot.generation;
        let handle = tokio::spawn(search(generation));
        slot.current = Some(handle.abort_handle());

        SearchHandle {
            generation,
            inner: handle,
        }
    }

    /// Whether `generation` belongs to the most recently started search
    pub fn is_current(&self, generation: u64) -> bool {
        self.slot().generation == generation
    }

    /// Generation of the most recently started search, 0 before the first
    pub fn generation(&self) -> u64 {
        self.slot().generation
    }

    /// Whether a search is running
    pub fn is_active(&self) -> bool {
        self.slot()
            .current
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel the running search, if any, and retire its generation.
    ///
    /// Returns the new generation. No earlier search is current afterwards,
    /// so a search that outlives its abort can no longer publish.
    pub fn cancel(&self) -> u64 {
        let mut slot = self.slot();
        if let Some(current) = slot.current.take() {
            current.abort();
        }
        slot.generation += 1;
        debug!(generation = slot.generation, "search session cancelled");
        slot.generation
    }
}

/// Awaitable handle to a search started by [`SearchSession::run`].
///
/// Unlike a query handle, dropping it leaves the search running; the
/// session alone decides when a search is cancelled.
#[derive(Debug)]
pub struct SearchHandle<T> {
    generation: u64,
    inner: JoinHandle<T>,
}

impl<T> SearchHandle<T> {
    /// Generation assigned to this search
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the search has finished or was cancelled
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl<T> Future for SearchHandle<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner)
            .poll(cx)
            .map(|joined| joined.map_err(Into::into))
    }
}
