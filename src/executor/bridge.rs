//! Async completion bridge.
//!
//! Workers hand deferred completions here instead of blocking: each watch
//! pairs a [`CompletionSignal`] with a resumption closure that runs the
//! post hook and the strand's terminal transition. One dedicated thread
//! drives all outstanding watches, so a strand suspended on a slow future
//! costs no worker.
//!
//! Shutdown policy: closing the watch channel stops the bridge. Watches
//! whose signals have already settled at that point are still resumed;
//! unsettled watches are dropped (their post hooks never run), matching
//! `stop`'s drop-queued-work semantics.

use crate::error::{Error, Result};
use crate::task::completion::CompletionSignal;
use futures::executor::block_on;
use futures::future::{BoxFuture, FutureExt};
use futures::select;
use futures::stream::{FuturesUnordered, StreamExt};
use std::thread::{self, JoinHandle};

/// Resumes the strand once the watched signal settles.
pub(crate) type ResumeFn = Box<dyn FnOnce() + Send + 'static>;

struct Watch {
    signal: CompletionSignal,
    resume: ResumeFn,
}

impl Watch {
    async fn settle(self) {
        match self.signal.await {
            Ok(_) => {}
            Err(error) => {
                // the identity must not stall: resume regardless
                tracing::warn!(%error, "async completion settled with error");
            }
        }
        (self.resume)();
    }
}

/// Cheap handle for registering watches, cloned into each worker.
#[derive(Debug, Clone)]
pub(crate) struct BridgeHandle {
    tx: async_channel::Sender<Watch>,
}

impl BridgeHandle {
    pub(crate) fn watch(&self, signal: CompletionSignal, resume: ResumeFn) {
        if self.tx.try_send(Watch { signal, resume }).is_err() {
            tracing::debug!("completion bridge stopped, dropping watch");
        }
    }
}

/// The dedicated completion-driving thread.
#[derive(Debug)]
pub(crate) struct CompletionBridge {
    tx: async_channel::Sender<Watch>,
    thread: Option<JoinHandle<()>>,
}

impl CompletionBridge {
    pub(crate) fn start(thread_name: String) -> Result<Self> {
        let (tx, rx) = async_channel::unbounded();
        let thread = thread::Builder::new()
            .name(thread_name)
            .spawn(move || drive(rx))
            .map_err(|e| Error::executor(format!("completion bridge spawn failed: {e}")))?;

        Ok(Self {
            tx,
            thread: Some(thread),
        })
    }

    pub(crate) fn handle(&self) -> BridgeHandle {
        BridgeHandle {
            tx: self.tx.clone(),
        }
    }

    pub(crate) fn stop(&mut self) {
        self.tx.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for CompletionBridge {
    fn drop(&mut self) {
        self.stop();
    }
}

fn drive(rx: async_channel::Receiver<Watch>) {
    block_on(async move {
        let mut incoming = Box::pin(rx).fuse();
        let mut outstanding: FuturesUnordered<BoxFuture<'static, ()>> = FuturesUnordered::new();

        loop {
            select! {
                watch = incoming.next() => match watch {
                    Some(watch) => outstanding.push(watch.settle().boxed()),
                    None => break,
                },
                _ = outstanding.select_next_some() => {}
            }
        }

        // channel closed: resume what already settled, drop the rest
        while let Some(Some(())) = outstanding.next().now_or_never() {}
    });
}
