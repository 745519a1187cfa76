//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use parking_lot::{Condvar, Mutex};
use std::any::TypeId;
use std::sync::{Arc, Once};
use std::time::Duration;
use strand::prelude::*;

static TRACING: Once = Once::new();

/// Route engine log records through a test-friendly subscriber, once per
/// test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Count-down latch in the shape the suites coordinate on.
pub struct Latch {
    remaining: Mutex<usize>,
    cv: Condvar,
}

impl Latch {
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            remaining: Mutex::new(count),
            cv: Condvar::new(),
        })
    }

    pub fn count_down(&self) {
        let mut remaining = self.remaining.lock();
        if *remaining > 0 {
            *remaining -= 1;
            if *remaining == 0 {
                self.cv.notify_all();
            }
        }
    }

    pub fn count(&self) -> usize {
        *self.remaining.lock()
    }

    /// Wait until the latch reaches zero. Returns `false` on timeout.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let mut remaining = self.remaining.lock();
        let _ = self
            .cv
            .wait_while_for(&mut remaining, |r| *r > 0, timeout);
        *remaining == 0
    }
}

/// A gate tasks can block on until the test opens it.
pub struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            open: Mutex::new(false),
            cv: Condvar::new(),
        })
    }

    pub fn open(&self) {
        *self.open.lock() = true;
        self.cv.notify_all();
    }

    pub fn wait(&self) {
        let mut open = self.open.lock();
        self.cv.wait_while(&mut open, |open| !*open);
    }
}

pub struct TestInput;

impl TaskInput for TestInput {}

/// Output used across the suites; async flavors mirror a settable future
/// that is already resolved (or failed) when the executor receives it.
#[derive(Default)]
pub struct TestOutput {
    state: AsyncState,
}

impl TestOutput {
    pub fn sync() -> Self {
        Self::default()
    }

    pub fn resolved_async() -> Self {
        let mut output = Self::default();
        let handle = output.state.arm();
        handle.complete(true);
        output
    }

    pub fn failing_async() -> Self {
        let mut output = Self::default();
        let handle = output.state.arm();
        handle.fail(Error::task("deliberate async failure"));
        output
    }

    /// Async output whose completion stays with the caller.
    pub fn pending_async() -> (Self, CompletionHandle) {
        let mut output = Self::default();
        let handle = output.state.arm();
        (output, handle)
    }
}

impl TaskOutput for TestOutput {
    fn is_async(&self) -> bool {
        self.state.is_async()
    }
    fn mark_as_async(&mut self) {
        self.state.mark_as_async();
    }
    fn reset_async_status(&mut self) {
        self.state.reset();
    }
    fn take_async_signal(&mut self) -> Option<CompletionSignal> {
        self.state.take_signal()
    }
}

/// Context whose post hook does nothing; usable for every task shape.
pub struct TestContext {
    identity: String,
}

impl TestContext {
    pub fn new<S: Into<String>>(identity: S) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

impl TaskContext for TestContext {
    fn identity(&self) -> &str {
        &self.identity
    }
    fn owner(&self) -> TypeId {
        TypeId::of::<String>()
    }
}

impl InOutTaskContext<TestOutput> for TestContext {
    fn post(&self, _output: TestOutput) {}
}

impl OutTaskContext<TestOutput> for TestContext {
    fn post(&self, _output: TestOutput) {}
}

impl InTaskContext for TestContext {}

/// Context whose post hook panics.
pub struct PanickingPostContext {
    identity: String,
}

impl PanickingPostContext {
    pub fn new<S: Into<String>>(identity: S) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

impl TaskContext for PanickingPostContext {
    fn identity(&self) -> &str {
        &self.identity
    }
    fn owner(&self) -> TypeId {
        TypeId::of::<String>()
    }
}

impl InOutTaskContext<TestOutput> for PanickingPostContext {
    fn post(&self, _output: TestOutput) {
        panic!("deliberate post-hook panic");
    }
}

/// Context that records whether its post hook ran.
pub struct FlaggingContext {
    identity: String,
    posted: Arc<Mutex<bool>>,
}

impl FlaggingContext {
    pub fn new<S: Into<String>>(identity: S) -> (Self, Arc<Mutex<bool>>) {
        let posted = Arc::new(Mutex::new(false));
        (
            Self {
                identity: identity.into(),
                posted: posted.clone(),
            },
            posted,
        )
    }
}

impl TaskContext for FlaggingContext {
    fn identity(&self) -> &str {
        &self.identity
    }
    fn owner(&self) -> TypeId {
        TypeId::of::<String>()
    }
}

impl InOutTaskContext<TestOutput> for FlaggingContext {
    fn post(&self, _output: TestOutput) {
        *self.posted.lock() = true;
    }
}

/// The workhorse task: optionally sleeps, records its ordinal, and counts
/// the latch down only when the installed isolation handle is its own.
/// Implements all three shapes.
pub struct SequencedTask {
    pub latch: Arc<Latch>,
    pub number: i32,
    pub order: Arc<Mutex<Vec<i32>>>,
    pub delay_ms: u64,
    pub isolation: IsolationHandle,
}

impl SequencedTask {
    pub fn new(
        latch: &Arc<Latch>,
        number: i32,
        order: &Arc<Mutex<Vec<i32>>>,
        delay_ms: u64,
        isolation: &IsolationHandle,
    ) -> Self {
        Self {
            latch: latch.clone(),
            number,
            order: order.clone(),
            delay_ms,
            isolation: isolation.clone(),
        }
    }

    fn record(&self) {
        if self.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.delay_ms));
        }
        self.order.lock().push(self.number);
        if IsolationHandle::current().as_ref() == Some(&self.isolation) {
            self.latch.count_down();
        } else {
            eprintln!("isolation handle was not installed!");
        }
    }
}

impl InOutTask<TestInput, TestOutput> for SequencedTask {
    fn apply(&self, _input: TestInput, _output: &mut TestOutput) {
        self.record();
    }
    fn isolation(&self) -> &IsolationHandle {
        &self.isolation
    }
}

impl OutTask<TestOutput> for SequencedTask {
    fn apply(&self, _output: &mut TestOutput) {
        self.record();
    }
    fn isolation(&self) -> &IsolationHandle {
        &self.isolation
    }
}

impl InTask<TestInput> for SequencedTask {
    fn accept(&self, _input: TestInput) {
        self.record();
    }
    fn isolation(&self) -> &IsolationHandle {
        &self.isolation
    }
}

/// Records and counts down like [`SequencedTask`], then panics.
pub struct PanickingTask {
    inner: SequencedTask,
}

impl PanickingTask {
    pub fn new(
        latch: &Arc<Latch>,
        number: i32,
        order: &Arc<Mutex<Vec<i32>>>,
        isolation: &IsolationHandle,
    ) -> Self {
        Self {
            inner: SequencedTask::new(latch, number, order, 0, isolation),
        }
    }
}

impl InOutTask<TestInput, TestOutput> for PanickingTask {
    fn apply(&self, input: TestInput, output: &mut TestOutput) {
        InOutTask::apply(&self.inner, input, output);
        panic!("deliberate task panic");
    }
    fn isolation(&self) -> &IsolationHandle {
        &self.inner.isolation
    }
}

/// Blocks on a gate, then counts the latch down.
pub struct GatedTask {
    pub gate: Arc<Gate>,
    pub latch: Arc<Latch>,
    pub isolation: IsolationHandle,
}

impl InOutTask<TestInput, TestOutput> for GatedTask {
    fn apply(&self, _input: TestInput, _output: &mut TestOutput) {
        self.gate.wait();
        self.latch.count_down();
    }
    fn isolation(&self) -> &IsolationHandle {
        &self.isolation
    }
}

fn output_factory(async_mode: bool) -> impl FnOnce() -> TestOutput + Send + 'static {
    move || {
        if async_mode {
            TestOutput::resolved_async()
        } else {
            TestOutput::sync()
        }
    }
}

/// Submit one InOut recording task.
pub fn add_task(
    executor: &StrandExecutor,
    latch: &Arc<Latch>,
    identity: &str,
    async_mode: bool,
    number: i32,
    order: &Arc<Mutex<Vec<i32>>>,
    delay_ms: u64,
    isolation: &IsolationHandle,
) -> bool {
    executor.submit(Execution::in_out(
        TestContext::new(identity),
        || TestInput,
        output_factory(async_mode),
        SequencedTask::new(latch, number, order, delay_ms, isolation),
    ))
}

/// One Out submission.
pub fn add_out_task(
    executor: &StrandExecutor,
    latch: &Arc<Latch>,
    identity: &str,
    async_mode: bool,
    number: i32,
    order: &Arc<Mutex<Vec<i32>>>,
    delay_ms: u64,
    isolation: &IsolationHandle,
) -> bool {
    executor.submit(Execution::out(
        TestContext::new(identity),
        output_factory(async_mode),
        SequencedTask::new(latch, number, order, delay_ms, isolation),
    ))
}

/// One In submission.
pub fn add_in_task(
    executor: &StrandExecutor,
    latch: &Arc<Latch>,
    identity: &str,
    number: i32,
    order: &Arc<Mutex<Vec<i32>>>,
    delay_ms: u64,
    isolation: &IsolationHandle,
) -> bool {
    executor.submit(Execution::input_only(
        TestContext::new(identity),
        || TestInput,
        SequencedTask::new(latch, number, order, delay_ms, isolation),
    ))
}

/// Executor in the suites' default shape.
pub fn started_executor() -> StrandExecutor {
    init_tracing();
    let executor = StrandExecutor::new(Config::default()).unwrap();
    executor.start().unwrap();
    executor
}

pub fn new_order() -> Arc<Mutex<Vec<i32>>> {
    Arc::new(Mutex::new(Vec::new()))
}
