//! Input and output object contracts.

use super::completion::{completion_pair, CompletionHandle, CompletionSignal};

/// Marker for task input objects, built fresh per execution.
pub trait TaskInput: Send + 'static {}

/// Behavior the executor requires of task output objects.
///
/// Outputs are constructed per execution and never reused. The defaults
/// describe a plain synchronous output; implementors that support deferred
/// completion override the async items, typically by embedding an
/// [`AsyncState`].
pub trait TaskOutput: Send + 'static {
    /// Whether completion is deferred to a settable future.
    fn is_async(&self) -> bool {
        false
    }

    /// Flag the output as asynchronously completed.
    fn mark_as_async(&mut self) {}

    /// Clear the async flag. Called by the executor when the deferred
    /// completion settles, before the post hook runs.
    fn reset_async_status(&mut self) {}

    /// Whether an external collaborator timed this output out.
    fn is_timed_out(&self) -> bool {
        false
    }

    /// Flag the output as timed out. The executor carries this state for
    /// external collaborators and never branches on it.
    fn mark_as_timed_out(&mut self) {}

    /// Fallback behavior an external timeout layer should apply.
    fn timeout_fallback(&self) -> TimeoutFallback {
        TimeoutFallback::Failure
    }

    /// Hand the completion signal to the executor.
    ///
    /// Returns `Some` at most once, and only when [`is_async`](Self::is_async)
    /// reports `true`; the strand then stays suspended until the signal
    /// settles.
    fn take_async_signal(&mut self) -> Option<CompletionSignal> {
        None
    }
}

/// Behavior an external timeout layer applies when a deferred completion
/// times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutFallback {
    /// Treat the timed-out operation as failed.
    Failure,
    /// Treat the timed-out operation as succeeded.
    Success,
}

/// Output for tasks that produce no result. All defaults apply.
#[derive(Debug, Default)]
pub struct DefaultTaskOutput;

impl TaskOutput for DefaultTaskOutput {}

/// Embeddable async-completion state for [`TaskOutput`] implementors.
///
/// Covers the bookkeeping behind the async items of the output contract:
///
/// ```
/// use strand::task::{AsyncState, CompletionSignal, TaskOutput};
///
/// #[derive(Default)]
/// struct MyOutput {
///     async_state: AsyncState,
/// }
///
/// impl TaskOutput for MyOutput {
///     fn is_async(&self) -> bool {
///         self.async_state.is_async()
///     }
///     fn mark_as_async(&mut self) {
///         self.async_state.mark_as_async();
///     }
///     fn reset_async_status(&mut self) {
///         self.async_state.reset();
///     }
///     fn take_async_signal(&mut self) -> Option<CompletionSignal> {
///         self.async_state.take_signal()
///     }
/// }
///
/// let mut output = MyOutput::default();
/// let handle = output.async_state.arm();
/// assert!(output.is_async());
/// handle.complete(true);
/// ```
#[derive(Debug, Default)]
pub struct AsyncState {
    is_async: bool,
    signal: Option<CompletionSignal>,
}

impl AsyncState {
    /// Create a completion pair, store the signal, flip the async flag,
    /// and return the settable handle.
    pub fn arm(&mut self) -> CompletionHandle {
        let (handle, signal) = completion_pair();
        self.signal = Some(signal);
        self.is_async = true;
        handle
    }

    /// Whether the output is currently flagged async.
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    /// Flip the async flag without arming a signal.
    pub fn mark_as_async(&mut self) {
        self.is_async = true;
    }

    /// Clear the async flag.
    pub fn reset(&mut self) {
        self.is_async = false;
    }

    /// Hand out the stored signal, if any.
    pub fn take_signal(&mut self) -> Option<CompletionSignal> {
        self.signal.take()
    }
}
