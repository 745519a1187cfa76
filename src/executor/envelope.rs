//! Submission envelopes and execution strategies.
//!
//! The three task shapes are erased at the API boundary: each constructor
//! captures the context, factories, and task into a single boxed invocation
//! the engine can run without knowing the concrete types. The invocation
//! classifies its result as settled (post hook ready to run) or deferred
//! (completion handed to a settable future).

use crate::task::completion::CompletionSignal;
use crate::task::context::{InOutTaskContext, InTaskContext, OutTaskContext, TaskContext};
use crate::task::io::{TaskInput, TaskOutput};
use crate::task::isolation::IsolationHandle;
use crate::task::shape::{InOutTask, InTask, OutTask};
use crate::util::panic::panic_message;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Runs the post hook with the settled output.
pub(crate) type FinishFn = Box<dyn FnOnce() + Send + 'static>;

type InvokeFn = Box<dyn FnOnce() -> Invocation + Send + 'static>;

/// Result of running an envelope's task body.
pub(crate) enum Invocation {
    /// The output settled synchronously; `finish` runs the post hook.
    Settled(FinishFn),
    /// The output deferred completion to a settable future; `finish` runs
    /// once the signal settles.
    Deferred {
        signal: CompletionSignal,
        finish: FinishFn,
    },
}

/// One submission: context, factories, and task, submitted atomically.
///
/// Build one with [`in_out`](Execution::in_out), [`out`](Execution::out),
/// or [`input_only`](Execution::input_only) and hand it to
/// [`StrandExecutor::submit`](super::StrandExecutor::submit).
pub struct Execution {
    identity: String,
    isolation: IsolationHandle,
    invoke: InvokeFn,
}

impl Execution {
    /// An envelope for a task that consumes an input and settles an output.
    pub fn in_out<I, O, C, T, FI, FO>(
        context: C,
        input_factory: FI,
        output_factory: FO,
        task: T,
    ) -> Self
    where
        I: TaskInput,
        O: TaskOutput,
        C: InOutTaskContext<O>,
        T: InOutTask<I, O>,
        FI: FnOnce() -> I + Send + 'static,
        FO: FnOnce() -> O + Send + 'static,
    {
        let identity = context.identity().to_string();
        let isolation = task.isolation().clone();
        let invoke: InvokeFn = Box::new(move || {
            let input = input_factory();
            let mut output = output_factory();

            let faulted = run_body(context.identity(), || task.apply(input, &mut output));

            if !faulted && output.is_async() {
                if let Some(signal) = output.take_async_signal() {
                    let finish: FinishFn = Box::new(move || {
                        output.reset_async_status();
                        context.post(output);
                    });
                    return Invocation::Deferred { signal, finish };
                }
            }

            Invocation::Settled(Box::new(move || context.post(output)))
        });

        Self {
            identity,
            isolation,
            invoke,
        }
    }

    /// An envelope for a task that settles an output with no input.
    pub fn out<O, C, T, FO>(context: C, output_factory: FO, task: T) -> Self
    where
        O: TaskOutput,
        C: OutTaskContext<O>,
        T: OutTask<O>,
        FO: FnOnce() -> O + Send + 'static,
    {
        let identity = context.identity().to_string();
        let isolation = task.isolation().clone();
        let invoke: InvokeFn = Box::new(move || {
            let mut output = output_factory();

            let faulted = run_body(context.identity(), || task.apply(&mut output));

            if !faulted && output.is_async() {
                if let Some(signal) = output.take_async_signal() {
                    let finish: FinishFn = Box::new(move || {
                        output.reset_async_status();
                        context.post(output);
                    });
                    return Invocation::Deferred { signal, finish };
                }
            }

            Invocation::Settled(Box::new(move || context.post(output)))
        });

        Self {
            identity,
            isolation,
            invoke,
        }
    }

    /// An envelope for a task that consumes an input; nothing flows back
    /// and no post hook runs.
    pub fn input_only<I, C, T, FI>(context: C, input_factory: FI, task: T) -> Self
    where
        I: TaskInput,
        C: InTaskContext,
        T: InTask<I>,
        FI: FnOnce() -> I + Send + 'static,
    {
        let identity = context.identity().to_string();
        let isolation = task.isolation().clone();
        let invoke: InvokeFn = Box::new(move || {
            let input = input_factory();
            run_body(context.identity(), || task.accept(input));
            Invocation::Settled(Box::new(|| {}))
        });

        Self {
            identity,
            isolation,
            invoke,
        }
    }

    /// The identity key this envelope is ordered under.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub(crate) fn isolation(&self) -> &IsolationHandle {
        &self.isolation
    }

    pub(crate) fn invoke(self) -> Invocation {
        (self.invoke)()
    }
}

impl fmt::Debug for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Execution")
            .field("identity", &self.identity)
            .field("isolation", &self.isolation)
            .finish_non_exhaustive()
    }
}

// Task body fault isolation: a panicking task is treated as completed with
// the output in its last-observed state.
fn run_body(identity: &str, body: impl FnOnce()) -> bool {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(()) => false,
        Err(payload) => {
            tracing::warn!(
                identity,
                panic = %panic_message(payload),
                "task body panicked, completing with last-observed output"
            );
            true
        }
    }
}
