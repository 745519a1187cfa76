//! Convenient re-exports for common strand types and traits.
//!
//! ```
//! use strand::prelude::*;
//! ```

pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{Execution, StrandExecutor};
pub use crate::task::{
    completion_pair, AsyncState, CompletionHandle, CompletionSignal, DefaultTaskOutput,
    InOutTask, InOutTaskContext, InTask, InTaskContext, IsolationHandle, OutTask,
    OutTaskContext, TaskContext, TaskInput, TaskOutput, TimeoutFallback,
};
