//! The three task shapes.
//!
//! A task either transforms an input into an output (`InOut`), produces an
//! output alone (`Out`), or consumes an input with no result (`In`). The
//! output is passed by mutable reference so that a panicking task body
//! leaves it observable in its last state for the post hook; replacing the
//! whole output is an assignment through the reference.

use super::io::{TaskInput, TaskOutput};
use super::isolation::IsolationHandle;

/// A task that consumes an input and settles an output.
pub trait InOutTask<I: TaskInput, O: TaskOutput>: Send + 'static {
    /// Run the task body, mutating (or replacing) the output in place.
    fn apply(&self, input: I, output: &mut O);

    /// The isolation handle to install while this task runs.
    fn isolation(&self) -> &IsolationHandle;
}

/// A task that settles an output with no input.
pub trait OutTask<O: TaskOutput>: Send + 'static {
    /// Run the task body, mutating (or replacing) the output in place.
    fn apply(&self, output: &mut O);

    /// The isolation handle to install while this task runs.
    fn isolation(&self) -> &IsolationHandle;
}

/// A task that consumes an input; nothing flows back.
pub trait InTask<I: TaskInput>: Send + 'static {
    /// Run the task body.
    fn accept(&self, input: I);

    /// The isolation handle to install while this task runs.
    fn isolation(&self) -> &IsolationHandle;
}
