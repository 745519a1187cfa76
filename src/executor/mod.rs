//! The submission facade and its machinery.
//!
//! Control flow: producer → [`StrandExecutor::submit`] → registry →
//! strand enqueue → (on Idle→Ready) intake publish → worker pickup →
//! one task body → sync completion, or suspension until a settable future
//! resolves → post hook → strand republishes or goes idle.

mod bridge;
mod envelope;
mod intake;
mod queue;
mod registry;
mod worker;

pub use envelope::Execution;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::util::gauge::InFlightGauge;
use bridge::CompletionBridge;
use intake::Intake;
use parking_lot::Mutex;
use registry::QueueRegistry;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use worker::Worker;

/// Per-identity ordered task executor.
///
/// Accepts [`Execution`] envelopes from any number of producer threads and
/// runs them on a fixed worker pool. Envelopes sharing an identity execute
/// strictly in submission order; distinct identities run in parallel.
/// [`submit`](Self::submit) never blocks: it returns `false` when the
/// in-flight bound is reached.
pub struct StrandExecutor {
    config: Config,
    gauge: Arc<InFlightGauge>,
    registry: QueueRegistry,
    intake: Intake,
    lifecycle: Mutex<Lifecycle>,
    started: AtomicBool,
    stopped: AtomicBool,
}

#[derive(Default)]
struct Lifecycle {
    workers: Vec<JoinHandle<()>>,
    shutdown_tx: Option<crossbeam_channel::Sender<()>>,
    bridge: Option<CompletionBridge>,
}

impl StrandExecutor {
    /// Create an executor. Workers are not spawned until
    /// [`start`](Self::start).
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let gauge = Arc::new(InFlightGauge::new(config.max_pending));
        let intake = Intake::with_capacity(config.max_pending);

        Ok(Self {
            config,
            gauge,
            registry: QueueRegistry::new(),
            intake,
            lifecycle: Mutex::new(Lifecycle::default()),
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        })
    }

    /// Spawn the worker pool and the completion bridge.
    ///
    /// Idempotent: calling again on a started executor is a no-op.
    /// Submissions made before `start` are accepted and picked up once the
    /// workers come online.
    pub fn start(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.lock();
        if self.started.load(Ordering::Acquire) {
            return Ok(());
        }

        let bridge =
            CompletionBridge::start(format!("{}-completion", self.config.thread_name_prefix))?;
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(0);

        let count = self.config.worker_count();
        let mut workers = Vec::with_capacity(count);

        for id in 0..count {
            let worker = Worker {
                id,
                intake: self.intake.clone(),
                ready: self.intake.subscribe(),
                shutdown: shutdown_rx.clone(),
                gauge: self.gauge.clone(),
                bridge: bridge.handle(),
            };

            let mut builder =
                thread::Builder::new().name(format!("{}-{}", self.config.thread_name_prefix, id));
            if let Some(stack_size) = self.config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let handle = builder
                .spawn(move || worker.run())
                .map_err(|e| Error::executor(format!("worker spawn failed: {e}")))?;
            workers.push(handle);
        }

        lifecycle.workers = workers;
        lifecycle.shutdown_tx = Some(shutdown_tx);
        lifecycle.bridge = Some(bridge);
        self.started.store(true, Ordering::Release);

        tracing::debug!(workers = count, "executor started");
        Ok(())
    }

    /// Submit one envelope.
    ///
    /// Returns `true` when the envelope was accepted. Returns `false`,
    /// with no other state change, when the in-flight bound is reached
    /// or after [`stop`](Self::stop). Two accepted submissions with the
    /// same identity execute in the order their enqueues interleaved;
    /// from a single producer thread that is program order.
    pub fn submit(&self, execution: Execution) -> bool {
        if self.stopped.load(Ordering::Acquire) {
            return false;
        }
        if !self.gauge.try_acquire() {
            return false;
        }

        let strand = self.registry.get_or_create(execution.identity());
        if strand.enqueue(execution) {
            self.intake.publish(strand);
        }
        true
    }

    /// Stop the executor.
    ///
    /// Workers finish their current task and exit; queued envelopes are
    /// discarded; async completions that have not settled yet are dropped
    /// (their post hooks never run). Producers of discarded work observe
    /// only that their own side channels never fire. Idempotent.
    pub fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock();
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }

        // dropping the sender unblocks every worker's select
        lifecycle.shutdown_tx.take();
        for worker in lifecycle.workers.drain(..) {
            let _ = worker.join();
        }

        if let Some(mut bridge) = lifecycle.bridge.take() {
            bridge.stop();
        }

        self.intake.drain();
        let discarded = self.registry.clear_all();
        if discarded > 0 {
            tracing::debug!(discarded, "queued envelopes discarded on stop");
        }
    }

    /// Number of accepted-but-not-completed submissions.
    pub fn in_flight(&self) -> usize {
        self.gauge.current()
    }

    /// The configured in-flight bound.
    pub fn capacity(&self) -> usize {
        self.gauge.limit()
    }

    /// The configured worker count.
    pub fn worker_threads(&self) -> usize {
        self.config.worker_count()
    }
}

impl Drop for StrandExecutor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for StrandExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrandExecutor")
            .field("in_flight", &self.gauge.current())
            .field("capacity", &self.gauge.limit())
            .field("started", &self.started.load(Ordering::Relaxed))
            .field("stopped", &self.stopped.load(Ordering::Relaxed))
            .finish()
    }
}
