//! Callback and priority types shared by the registry and its snapshots.

use std::fmt;
use std::sync::Arc;

/// A zero-argument unit of work executed once at process termination.
///
/// Identity is the `Arc` allocation: two clones of the same `Arc` are the same
/// callback, two separately allocated closures are not (even if they do the same thing).
pub type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Ordering key for callbacks. Lower values run first.
pub type Priority = i32;

/// Runs before everything else.
pub const HIGHEST_PRECEDENCE: Priority = Priority::MIN;

/// Priority used when the caller has no preference.
pub const NORMAL_PRIORITY: Priority = 0;

/// Runs after everything else.
pub const LOWEST_PRECEDENCE: Priority = Priority::MAX;

/// Ordering slot of a pending callback: priority first, then registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Slot {
    pub(crate) priority: Priority,
    pub(crate) sequence: u64,
}

/// Returns `true` if both handles point at the same callback allocation.
///
/// Only the data pointer is compared; vtable pointers of the same closure may differ
/// between codegen units.
pub(crate) fn same_callback(a: &Callback, b: &Callback) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// A read-only snapshot entry describing one pending callback.
///
/// Holding a `PendingCallback` does not keep the callback registered; it is a copy
/// taken by [`ShutdownRegistry::snapshot`](crate::ShutdownRegistry::snapshot).
#[derive(Clone)]
pub struct PendingCallback {
    slot: Slot,
    callback: Callback,
}

impl PendingCallback {
    pub(crate) fn new(slot: Slot, callback: Callback) -> Self {
        Self { slot, callback }
    }

    /// The priority the callback was registered with.
    pub fn priority(&self) -> Priority {
        self.slot.priority
    }

    /// Registration order within the owning registry.
    pub fn sequence(&self) -> u64 {
        self.slot.sequence
    }

    /// The registered callback.
    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    /// Returns `true` if this entry refers to `callback`.
    pub fn is(&self, callback: &Callback) -> bool {
        same_callback(&self.callback, callback)
    }
}

impl fmt::Debug for PendingCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCallback")
            .field("priority", &self.slot.priority)
            .field("sequence", &self.slot.sequence)
            .field("callback", &Arc::as_ptr(&self.callback))
            .finish()
    }
}
