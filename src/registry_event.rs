use crate::Priority;

/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use shutdown_hook_registry::RegistryEvent;
///
/// let event = RegistryEvent::Register { priority: 1, added: true };
/// assert_eq!(event.to_string(), "register { priority: 1, added: true }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A callback registration was attempted.
    Register {
        /// Priority the callback was offered with
        priority: Priority,
        /// Whether the pending set changed
        added: bool,
    },

    /// A callback removal was attempted.
    Unregister {
        /// Whether a pending callback was removed
        removed: bool,
    },

    /// The pending set grew past its configured soft capacity.
    CapacityExceeded {
        /// Number of pending callbacks after the registration
        len: usize,
        /// Configured soft capacity
        capacity: usize,
    },

    /// The drain started with this many pending callbacks.
    DrainStarted {
        pending: usize,
    },

    /// A callback is about to run.
    Run {
        priority: Priority,
        sequence: u64,
    },

    /// A callback panicked while running; the drain carried on.
    CallbackFailed {
        priority: Priority,
        sequence: u64,
        /// Panic payload rendered as text
        message: String,
    },

    /// The drain finished and the pending set is empty.
    Drained {
        executed: usize,
        failed: usize,
    },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Register { priority, added } => {
                write!(f, "register {{ priority: {}, added: {} }}", priority, added)
            }
            RegistryEvent::Unregister { removed } => {
                write!(f, "unregister {{ removed: {} }}", removed)
            }
            RegistryEvent::CapacityExceeded { len, capacity } => {
                write!(
                    f,
                    "capacity exceeded {{ len: {}, capacity: {} }}",
                    len, capacity
                )
            }
            RegistryEvent::DrainStarted { pending } => {
                write!(f, "drain started {{ pending: {} }}", pending)
            }
            RegistryEvent::Run { priority, sequence } => {
                write!(f, "run {{ priority: {}, sequence: {} }}", priority, sequence)
            }
            RegistryEvent::CallbackFailed {
                priority,
                sequence,
                message,
            } => write!(
                f,
                "callback failed {{ priority: {}, sequence: {}, message: {} }}",
                priority, sequence, message
            ),
            RegistryEvent::Drained { executed, failed } => {
                write!(f, "drained {{ executed: {}, failed: {} }}", executed, failed)
            }
        }
    }
}
