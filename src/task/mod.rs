//! Task SPI: the capability contracts consumed by the executor.
//!
//! Collaborators inject work through three task shapes ([`InOutTask`],
//! [`OutTask`], [`InTask`]), a per-submission context carrying the identity
//! key and post hook, and input/output objects built fresh per execution.
//! The executor only consumes the capabilities listed here; everything else
//! about a task is opaque to it.

pub mod completion;
pub mod context;
pub mod io;
pub mod isolation;
pub mod shape;

pub use completion::{completion_pair, CompletionHandle, CompletionSignal};
pub use context::{InOutTaskContext, InTaskContext, OutTaskContext, TaskContext};
pub use io::{AsyncState, DefaultTaskOutput, TaskInput, TaskOutput, TimeoutFallback};
pub use isolation::IsolationHandle;
pub use shape::{InOutTask, InTask, OutTask};
