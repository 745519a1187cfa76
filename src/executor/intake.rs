//! The bounded ready-token channel feeding the worker pool.

use super::queue::Strand;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::Arc;

/// MPMC channel of strands with work ready to run.
///
/// The capacity equals the in-flight bound as a defensive backstop; the
/// authoritative back-pressure is the in-flight gauge, which keeps the
/// number of ready tokens strictly below the number of admitted
/// submissions. `publish` therefore never blocks.
#[derive(Debug, Clone)]
pub(crate) struct Intake {
    tx: Sender<Arc<Strand>>,
    rx: Receiver<Arc<Strand>>,
}

impl Intake {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx }
    }

    /// Publish a ready strand. Non-blocking on every path.
    pub(crate) fn publish(&self, strand: Arc<Strand>) {
        match self.tx.try_send(strand) {
            Ok(()) => {}
            Err(TrySendError::Full(strand)) => {
                // unreachable while the gauge invariant holds
                tracing::error!(
                    identity = %strand.identity(),
                    "intake backstop overflow, ready token dropped"
                );
            }
            Err(TrySendError::Disconnected(_)) => {
                // shutdown in progress, queued work is being discarded
            }
        }
    }

    pub(crate) fn receiver(&self) -> &Receiver<Arc<Strand>> {
        &self.rx
    }

    /// An owned receiver for a worker's select loop.
    pub(crate) fn subscribe(&self) -> Receiver<Arc<Strand>> {
        self.rx.clone()
    }

    /// Empty the channel (shutdown). Returns the token count.
    pub(crate) fn drain(&self) -> usize {
        let mut drained = 0;
        while self.rx.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}
