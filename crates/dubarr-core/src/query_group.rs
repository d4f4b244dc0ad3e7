//! Tracking of in-flight fetches
//!
//! A [`QueryGroup`] remembers every fetch spawned through it so a newer
//! search can cancel them all at once, including fetches an older search
//! started halfway through its batch.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

use crate::error::Result;

/// A set of outstanding asynchronous operations that can be cancelled together.
///
/// Cloning a group yields another handle to the same tracked set.
#[derive(Debug, Clone, Default)]
pub struct QueryGroup {
    handles: Arc<Mutex<Vec<AbortHandle>>>,
}

impl QueryGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    fn handles(&self) -> MutexGuard<'_, Vec<AbortHandle>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn `operation` on the runtime and track it.
    ///
    /// The operation stays tracked until [`QueryGroup::reset`]. Awaiting the
    /// returned handle yields the operation's output, or
    /// `DubarrError::Cancelled` if it was cancelled first.
    pub fn spawn<F>(&self, operation: F) -> QueryHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let handle = tokio::spawn(operation);
        self.handles().push(handle.abort_handle());
        QueryHandle { inner: handle }
    }

    /// Request cancellation of every tracked operation.
    ///
    /// Does not wait for the operations to stop. Operations that already
    /// completed are unaffected.
    pub fn cancel_all(&self) {
        let handles = self.handles();
        debug!(count = handles.len(), "cancelling tracked queries");
        for handle in handles.iter() {
            handle.abort();
        }
    }

    /// Stop tracking every operation without cancelling any of them.
    pub fn reset(&self) {
        self.handles().clear();
    }

    /// Whether any operation is tracked
    pub fn is_active(&self) -> bool {
        !self.handles().is_empty()
    }

    /// Number of tracked operations
    pub fn len(&self) -> usize {
        self.handles().len()
    }

    /// Whether no operation is tracked
    pub fn is_empty(&self) -> bool {
        self.handles().is_empty()
    }
}

/// Awaitable handle to an operation spawned through a [`QueryGroup`].
///
/// Dropping the handle before the operation finishes cancels it, so a
/// caller that is itself cancelled takes its pending fetch down with it.
#[derive(Debug)]
pub struct QueryHandle<T> {
    inner: JoinHandle<T>,
}

impl<T> QueryHandle<T> {
    /// Request cancellation of this operation
    pub fn cancel(&self) {
        self.inner.abort();
    }

    /// Whether the operation has finished, successfully or not
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl<T> Future for QueryHandle<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner)
            .poll(cx)
            .map(|joined| joined.map_err(Into::into))
    }
}

impl<T> Drop for QueryHandle<T> {
    fn drop(&mut self) {
        self.inner.abort();
    }
}
