//! STRAND - per-identity ordered task execution
//!
//! A concurrency engine that accepts heterogeneous unit-of-work submissions
//! from many producers and runs them on a fixed pool of worker threads.
//! Submissions that share an identity key (a *strand*) execute strictly in
//! submission order; distinct strands execute in parallel. A bounded
//! in-flight gauge applies back-pressure by rejecting submissions once
//! capacity is reached, and tasks may defer their completion to a settable
//! future without tying up a worker thread.
//!
//! # Quick Start
//!
//! ```no_run
//! use strand::prelude::*;
//! use std::any::TypeId;
//!
//! struct Noop;
//! impl TaskInput for Noop {}
//!
//! struct Print(IsolationHandle);
//! impl InTask<Noop> for Print {
//!     fn accept(&self, _input: Noop) {
//!         println!("hello from a strand worker");
//!     }
//!     fn isolation(&self) -> &IsolationHandle {
//!         &self.0
//!     }
//! }
//!
//! struct Ctx(String);
//! impl TaskContext for Ctx {
//!     fn identity(&self) -> &str {
//!         &self.0
//!     }
//!     fn owner(&self) -> TypeId {
//!         TypeId::of::<Print>()
//!     }
//! }
//! impl InTaskContext for Ctx {}
//!
//! let executor = StrandExecutor::new(Config::default()).unwrap();
//! executor.start().unwrap();
//!
//! let handle = IsolationHandle::new("demo");
//! let accepted = executor.submit(Execution::input_only(
//!     Ctx("client-1".into()),
//!     || Noop,
//!     Print(handle),
//! ));
//! assert!(accepted);
//!
//! executor.stop();
//! ```
//!
//! # Guarantees
//!
//! - **Per-identity ordering**: acceptance order = execution-start order =
//!   post-hook order for every identity.
//! - **Isolation**: a task's [`IsolationHandle`](task::IsolationHandle) is
//!   installed on the executing thread for the task body and post hook.
//! - **Liveness**: panicking tasks, post hooks, and failed completion
//!   futures never stall their strand or the engine.
//! - **Back-pressure**: [`submit`](executor::StrandExecutor::submit) returns
//!   `false` instead of blocking when the in-flight bound is reached.

#![warn(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod task;
pub mod util;

pub use config::{Config, ConfigBuilder, DEFAULT_MAX_PENDING};
pub use error::{Error, Result};
pub use executor::{Execution, StrandExecutor};
