//! Thread-local isolation handles.
//!
//! Every task carries an [`IsolationHandle`], an opaque capability marker
//! that must be installed on the executing thread for the duration of the
//! task body and its post hook. Workers install the handle before invoking
//! the task and restore the previous one on all exit paths; task code can
//! observe the installed handle through [`IsolationHandle::current`].

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

thread_local! {
    static ACTIVE: RefCell<Option<IsolationHandle>> = const { RefCell::new(None) };
}

/// Opaque isolation context attached to a task.
///
/// Handles are cheap to clone and compare by pointer identity: two handles
/// are equal iff they originate from the same [`IsolationHandle::new`] call.
#[derive(Clone)]
pub struct IsolationHandle {
    inner: Arc<Inner>,
}

struct Inner {
    label: String,
}

impl IsolationHandle {
    /// Create a fresh handle with a diagnostic label.
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                label: label.into(),
            }),
        }
    }

    /// Diagnostic label given at construction.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// The handle currently installed on this thread, if any.
    pub fn current() -> Option<IsolationHandle> {
        ACTIVE.with(|active| active.borrow().clone())
    }

    /// Install this handle on the current thread, returning a guard that
    /// restores the previously installed handle when dropped.
    pub(crate) fn install(&self) -> InstallGuard {
        let prev = ACTIVE.with(|active| active.borrow_mut().replace(self.clone()));
        InstallGuard { prev }
    }
}

impl PartialEq for IsolationHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for IsolationHandle {}

impl fmt::Debug for IsolationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IsolationHandle")
            .field("label", &self.inner.label)
            .finish()
    }
}

pub(crate) struct InstallGuard {
    prev: Option<IsolationHandle>,
}

impl Drop for InstallGuard {
    fn drop(&mut self) {
        let prev = self.prev.take();
        ACTIVE.with(|active| *active.borrow_mut() = prev);
    }
}
