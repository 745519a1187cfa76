//! Per-submission contexts.

use super::io::TaskOutput;
use std::any::TypeId;

/// Metadata attached to one submission.
///
/// The identity keys the ordering domain: submissions whose contexts report
/// the same identity execute strictly in submission order. The owner tag is
/// an opaque type handle carried for whoever consumes the post hook.
pub trait TaskContext: Send + 'static {
    /// The identity key. Equality is byte-equal string equality.
    fn identity(&self) -> &str;

    /// Opaque type tag of the submitting owner.
    fn owner(&self) -> TypeId;
}

/// Context for [`InOutTask`](super::InOutTask) submissions.
pub trait InOutTaskContext<O: TaskOutput>: TaskContext {
    /// Finalizer invoked with the settled output, after the task body
    /// returns or its deferred completion settles.
    fn post(&self, output: O);
}

/// Context for [`OutTask`](super::OutTask) submissions.
pub trait OutTaskContext<O: TaskOutput>: TaskContext {
    /// Finalizer invoked with the settled output.
    fn post(&self, output: O);
}

/// Context for [`InTask`](super::InTask) submissions. Carries no post hook.
pub trait InTaskContext: TaskContext {}
