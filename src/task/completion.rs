//! Settable completion futures for asynchronously finishing tasks.
//!
//! A task that cannot finish at synchronous return marks its output async
//! and hands the executor a [`CompletionSignal`]; the matching
//! [`CompletionHandle`] is resolved later by whatever finishes the work.
//! The strand stays suspended until the signal settles, so per-identity
//! ordering holds across the deferral.

use crate::error::{Error, Result};
use futures::channel::oneshot;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Create a linked completion pair.
pub fn completion_pair() -> (CompletionHandle, CompletionSignal) {
    let (tx, rx) = oneshot::channel();
    (CompletionHandle { tx }, CompletionSignal { rx })
}

/// The settable side of a completion.
///
/// Consumed by resolution; dropping it unresolved settles the signal with
/// [`Error::CompletionDropped`].
pub struct CompletionHandle {
    tx: oneshot::Sender<Result<bool>>,
}

impl CompletionHandle {
    /// Resolve the completion with a value.
    ///
    /// Returns `false` if the signal side is already gone (for example
    /// after executor shutdown); the resolution is then discarded.
    pub fn complete(self, value: bool) -> bool {
        self.tx.send(Ok(value)).is_ok()
    }

    /// Resolve the completion with an error.
    pub fn fail(self, error: Error) -> bool {
        self.tx.send(Err(error)).is_ok()
    }
}

impl fmt::Debug for CompletionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionHandle").finish_non_exhaustive()
    }
}

/// The awaitable side of a completion, consumed by the executor.
#[derive(Debug)]
pub struct CompletionSignal {
    rx: oneshot::Receiver<Result<bool>>,
}

impl Future for CompletionSignal {
    type Output = Result<bool>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(Error::CompletionDropped)),
            Poll::Pending => Poll::Pending,
        }
    }
}
