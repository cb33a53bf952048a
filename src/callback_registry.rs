//! The shutdown callback registry.
//!
//! A [`ShutdownRegistry`] keeps callbacks ordered by priority (ties in registration
//! order) and runs them exactly once, sequentially, when it is drained. Draining is
//! normally triggered by the termination hook installed with
//! [`install`](ShutdownRegistry::install).
//!
//! Policies:
//! - The pending set has **set semantics**: registering the same `Arc` twice returns
//!   `false` the second time.
//! - The capacity is **soft**: registrations past it succeed and are reported once
//!   per crossing through [`RegistryEvent::CapacityExceeded`] and a warning log.
//! - Once the drain starts, every `register`/`unregister` returns `false`.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use crate::registry_callback::{same_callback, Slot};
use crate::{
    shutdown_hooks, Callback, PendingCallback, Priority, RegistryConfig, RegistryError,
    RegistryEvent,
};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every [`RegistryEvent`] the registry emits. It runs after the
/// registry has released its locks, so it may call any method of the same registry.
/// A panic inside it is caught and logged; it never escapes a registry operation.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

#[derive(Default)]
struct Pending {
    queue: BTreeMap<Slot, Callback>,
    next_sequence: u64,
    draining: bool,
}

/// Outcome of a [`ShutdownRegistry::drain`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Callbacks that were run, including the ones that panicked.
    pub executed: usize,
    /// Callbacks that panicked.
    pub failed: usize,
}

/// A priority-ordered set of callbacks that runs once at shutdown.
///
/// # Examples
///
/// ```rust
/// use shutdown_hook_registry::{Callback, ShutdownRegistry};
/// use std::sync::{Arc, Mutex};
///
/// let order = Arc::new(Mutex::new(Vec::new()));
/// let registry = ShutdownRegistry::new();
///
/// for (name, priority) in [("A", 10), ("B", 1), ("C", 5)] {
///     let order = order.clone();
///     let callback: Callback = Arc::new(move || order.lock().unwrap().push(name));
///     assert!(registry.register(callback, priority));
/// }
///
/// registry.drain();
/// assert_eq!(*order.lock().unwrap(), vec!["B", "C", "A"]);
/// assert!(registry.snapshot().is_empty());
/// ```
pub struct ShutdownRegistry {
    config: RegistryConfig,
    pending: Mutex<Pending>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl Default for ShutdownRegistry {
    fn default() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl ShutdownRegistry {
    /// Creates a registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            pending: Mutex::new(Pending::default()),
            trace: Mutex::new(None),
        }
    }

    /// The configuration this registry was created with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Soft limit of pending callbacks.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// Replaces any previous callback. Lock poisoning is recovered.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();

        if let Some(callback) = callback {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(event))) {
                log::error!(
                    "Shutdown hook trace callback panicked on {}: {}",
                    event,
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------------------------------

    /// Adds `callback` to run at shutdown with the given priority.
    ///
    /// Returns `true` if the pending set changed. Returns `false` if the same callback
    /// is already pending or the registry has started draining.
    pub fn register(&self, callback: Callback, priority: Priority) -> bool {
        let (added, len) = {
            let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());

            if pending.draining {
                log::debug!("Shutdown hook callback rejected, registry is draining");
                (false, pending.queue.len())
            } else if pending
                .queue
                .values()
                .any(|existing| same_callback(existing, &callback))
            {
                log::debug!("Shutdown hook callback rejected, already registered");
                (false, pending.queue.len())
            } else {
                let slot = Slot {
                    priority,
                    sequence: pending.next_sequence,
                };
                pending.next_sequence += 1;
                pending.queue.insert(slot, callback);
                log::debug!(
                    "Shutdown hook callback registered: priority {}, sequence {}",
                    slot.priority,
                    slot.sequence
                );
                (true, pending.queue.len())
            }
        };

        self.emit_event(&RegistryEvent::Register { priority, added });

        if added && len == self.config.capacity.saturating_add(1) {
            log::warn!(
                "Shutdown hook callbacks exceed the configured capacity {} (now {})",
                self.config.capacity,
                len
            );
            self.emit_event(&RegistryEvent::CapacityExceeded {
                len,
                capacity: self.config.capacity,
            });
        }

        added
    }

    /// Removes a pending callback.
    ///
    /// Returns `false` if the callback is not pending (never registered, already run,
    /// or the registry is draining).
    pub fn unregister(&self, callback: &Callback) -> bool {
        let removed = {
            let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
            let slot = pending
                .queue
                .iter()
                .find(|(_, existing)| same_callback(existing, callback))
                .map(|(slot, _)| *slot);

            match slot {
                Some(slot) => pending.queue.remove(&slot).is_some(),
                None => false,
            }
        };

        log::debug!("Shutdown hook callback unregistered: {}", removed);
        self.emit_event(&RegistryEvent::Unregister { removed });
        removed
    }

    /// Copies the pending callbacks in execution order.
    ///
    /// The returned entries are detached from the registry.
    pub fn snapshot(&self) -> Vec<PendingCallback> {
        self.pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .queue
            .iter()
            .map(|(slot, callback)| PendingCallback::new(*slot, callback.clone()))
            .collect()
    }

    /// Returns `true` if `callback` is pending.
    pub fn contains(&self, callback: &Callback) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .queue
            .values()
            .any(|existing| same_callback(existing, callback))
    }

    /// Number of pending callbacks.
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .queue
            .len()
    }

    /// Returns `true` if no callback is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the drain has started.
    pub fn is_draining(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .draining
    }

    // ---------------------------------------------------------------------------------------------
    // Drain
    // ---------------------------------------------------------------------------------------------

    /// Runs every pending callback once, in priority order, on the calling thread.
    ///
    /// The pending set is taken out under the lock before anything runs, so it is empty
    /// afterwards and any registration made meanwhile (including from a callback) is
    /// rejected. A panicking callback is logged and reported as
    /// [`RegistryEvent::CallbackFailed`]; the remaining callbacks still run.
    ///
    /// Only the first call does anything; later calls return an empty report.
    pub fn drain(&self) -> DrainReport {
        let queue = {
            let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
            if pending.draining {
                log::debug!("Shutdown hook callbacks already drained");
                return DrainReport::default();
            }
            pending.draining = true;
            std::mem::take(&mut pending.queue)
        };

        log::debug!("Draining {} shutdown hook callback(s)", queue.len());
        self.emit_event(&RegistryEvent::DrainStarted {
            pending: queue.len(),
        });

        let mut report = DrainReport::default();
        for (slot, callback) in queue {
            log::trace!(
                "The shutdown hook callback is about to run: priority {}, sequence {}",
                slot.priority,
                slot.sequence
            );
            self.emit_event(&RegistryEvent::Run {
                priority: slot.priority,
                sequence: slot.sequence,
            });

            report.executed += 1;
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback())) {
                report.failed += 1;
                let message = panic_message(payload.as_ref());
                log::error!(
                    "Shutdown hook callback failed: priority {}, sequence {}: {}",
                    slot.priority,
                    slot.sequence,
                    message
                );
                self.emit_event(&RegistryEvent::CallbackFailed {
                    priority: slot.priority,
                    sequence: slot.sequence,
                    message,
                });
            }
        }

        log::debug!(
            "Shutdown hook callbacks drained: {} executed, {} failed",
            report.executed,
            report.failed
        );
        self.emit_event(&RegistryEvent::Drained {
            executed: report.executed,
            failed: report.failed,
        });
        report
    }

    /// Adds a process termination hook, named after
    /// [`RegistryConfig::hook_name`], that drains this registry at exit.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::HookAlreadyRegistered`] if a hook with the same name exists
    /// - [`RegistryError::ShutdownInProgress`] if the process is already exiting
    /// - [`RegistryError::AtExitRegistration`] if the exit handler could not be set up
    pub fn install(self: &Arc<Self>) -> Result<(), RegistryError> {
        let registry = Arc::clone(self);
        shutdown_hooks::add_shutdown_hook(self.config.hook_name.clone(), move || {
            registry.drain();
        })
    }
}

impl std::fmt::Debug for ShutdownRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownRegistry")
            .field("config", &self.config)
            .field("pending", &self.len())
            .field("draining", &self.is_draining())
            .finish()
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
