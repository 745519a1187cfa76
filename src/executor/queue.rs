//! Per-identity ordered queues.
//!
//! A strand holds the pending envelopes of one identity plus a small state
//! machine. The state machine is what keeps execution serialized: a strand
//! is published to the intake exactly once per Idle→Ready transition, and a
//! strand that is Running or WaitingAsync is never published; it
//! republishes itself on the terminal transition if more work arrived.
//!
//! Transitions: Idle→Ready (first enqueue), Ready→Running (worker pickup),
//! Running→WaitingAsync (deferred completion), Running|WaitingAsync→
//! {Idle, Ready} (terminal). At most one worker holds a strand in Running
//! or WaitingAsync at any instant.

use super::envelope::Execution;
use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StrandState {
    Idle,
    Ready,
    Running,
    WaitingAsync,
}

/// FIFO of pending envelopes for one identity.
#[derive(Debug)]
pub(crate) struct Strand {
    identity: String,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: StrandState,
    pending: VecDeque<Execution>,
}

impl Strand {
    pub(crate) fn new(identity: String) -> Self {
        Self {
            identity,
            inner: Mutex::new(Inner {
                state: StrandState::Idle,
                pending: VecDeque::new(),
            }),
        }
    }

    pub(crate) fn identity(&self) -> &str {
        &self.identity
    }

    /// Append an envelope. Returns `true` when the strand transitioned
    /// Idle→Ready; the caller is then the one publisher of this strand.
    pub(crate) fn enqueue(&self, execution: Execution) -> bool {
        let mut inner = self.inner.lock();
        inner.pending.push_back(execution);
        if inner.state == StrandState::Idle {
            inner.state = StrandState::Ready;
            true
        } else {
            false
        }
    }

    /// Worker pickup: Ready→Running and pop the head envelope.
    ///
    /// A `None` means a spurious token; the strand goes back to Idle.
    pub(crate) fn begin(&self) -> Option<Execution> {
        let mut inner = self.inner.lock();
        match inner.pending.pop_front() {
            Some(execution) => {
                inner.state = StrandState::Running;
                Some(execution)
            }
            None => {
                inner.state = StrandState::Idle;
                None
            }
        }
    }

    /// Running→WaitingAsync: the current envelope deferred its completion.
    pub(crate) fn suspend(&self) {
        self.inner.lock().state = StrandState::WaitingAsync;
    }

    /// Terminal transition after the current envelope completed. Returns
    /// `true` when more work is pending and the caller must republish.
    pub(crate) fn settle(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.pending.is_empty() {
            inner.state = StrandState::Idle;
            false
        } else {
            inner.state = StrandState::Ready;
            true
        }
    }

    /// Discard all pending envelopes (shutdown drain). Returns the count.
    pub(crate) fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let dropped = inner.pending.len();
        inner.pending.clear();
        inner.state = StrandState::Idle;
        dropped
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> StrandState {
        self.inner.lock().state
    }
}
