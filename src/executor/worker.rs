//! Worker threads.

use super::bridge::BridgeHandle;
use super::envelope::{FinishFn, Invocation};
use super::intake::Intake;
use super::queue::Strand;
use crate::task::isolation::IsolationHandle;
use crate::util::gauge::InFlightGauge;
use crate::util::panic::panic_message;
use crossbeam_channel::{select, Receiver};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub(crate) struct Worker {
    pub(crate) id: usize,
    pub(crate) intake: Intake,
    pub(crate) ready: Receiver<Arc<Strand>>,
    pub(crate) shutdown: Receiver<()>,
    pub(crate) gauge: Arc<InFlightGauge>,
    pub(crate) bridge: BridgeHandle,
}

impl Worker {
    // main loop
    pub(crate) fn run(self) {
        loop {
            select! {
                recv(self.ready) -> msg => match msg {
                    Ok(strand) => self.run_one(strand),
                    Err(_) => break,
                },
                recv(self.shutdown) -> _ => break,
            }
        }
        tracing::debug!(worker = self.id, "worker exiting");
    }

    /// Run exactly one envelope for a ready strand.
    ///
    /// Even if more envelopes arrive meanwhile, the strand is republished
    /// rather than drained, so it queues fairly behind other ready strands.
    fn run_one(&self, strand: Arc<Strand>) {
        let Some(execution) = strand.begin() else {
            return;
        };
        let isolation = execution.isolation().clone();

        let invocation = {
            let _guard = isolation.install();
            catch_unwind(AssertUnwindSafe(|| execution.invoke()))
        };

        match invocation {
            Ok(Invocation::Settled(finish)) => {
                complete(finish, &isolation, &self.gauge);
                settle(&strand, &self.intake);
            }
            Ok(Invocation::Deferred { signal, finish }) => {
                strand.suspend();

                let gauge = self.gauge.clone();
                let intake = self.intake.clone();
                let waiting = strand.clone();
                self.bridge.watch(
                    signal,
                    Box::new(move || {
                        complete(finish, &isolation, &gauge);
                        settle(&waiting, &intake);
                    }),
                );
            }
            Err(payload) => {
                // factory fault: no output exists, so no post hook runs
                tracing::error!(
                    identity = %strand.identity(),
                    panic = %panic_message(payload),
                    "execution setup panicked, envelope discarded"
                );
                self.gauge.release();
                settle(&strand, &self.intake);
            }
        }
    }
}

/// Run the post hook under the task's isolation handle, then release the
/// in-flight slot. Post-hook faults are logged and never propagate.
pub(crate) fn complete(finish: FinishFn, isolation: &IsolationHandle, gauge: &InFlightGauge) {
    {
        let _guard = isolation.install();
        if let Err(payload) = catch_unwind(AssertUnwindSafe(finish)) {
            tracing::warn!(panic = %panic_message(payload), "post hook panicked");
        }
    }
    gauge.release();
}

/// Terminal transition: republish the strand if more work arrived.
pub(crate) fn settle(strand: &Arc<Strand>, intake: &Intake) {
    if strand.settle() {
        intake.publish(strand.clone());
    }
}
