//! Identity → strand mapping.

use super::queue::Strand;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Concurrent map of identities to their strands.
///
/// Lookup-or-create is atomic under one lock; this is the only shared lock
/// on the submission hot path. Strands are never removed: the identity set
/// is bounded by clients, and keeping them sidesteps remove/re-insert races
/// against the single-worker invariant.
#[derive(Debug, Default)]
pub(crate) struct QueueRegistry {
    strands: Mutex<HashMap<String, Arc<Strand>>>,
}

impl QueueRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get_or_create(&self, identity: &str) -> Arc<Strand> {
        let mut strands = self.strands.lock();
        if let Some(strand) = strands.get(identity) {
            return strand.clone();
        }
        let strand = Arc::new(Strand::new(identity.to_string()));
        strands.insert(identity.to_string(), strand.clone());
        strand
    }

    /// Discard every queued envelope (shutdown drain). Returns the count.
    pub(crate) fn clear_all(&self) -> usize {
        let strands = self.strands.lock();
        strands.values().map(|strand| strand.clear()).sum()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.strands.lock().len()
    }
}
