//! The process-wide shutdown callback registry.
//!
//! The global registry is created on first use from [`RegistryConfig::from_env`] and
//! installed as the `shutdown-hook-callbacks` termination hook at the same time, so
//! anything registered through these functions runs when the process exits.
//!
//! # Examples
//!
//! ```
//! use shutdown_hook_registry::{add_shutdown_hook_callback, shutdown_hook_callbacks, Callback};
//! use std::sync::Arc;
//!
//! let flush: Callback = Arc::new(|| println!("flushing buffers"));
//! assert!(add_shutdown_hook_callback(flush.clone(), 10));
//!
//! assert!(shutdown_hook_callbacks().iter().any(|entry| entry.is(&flush)));
//! ```

use std::sync::{Arc, LazyLock};

use crate::{Callback, PendingCallback, Priority, RegistryConfig, RegistryEvent, ShutdownRegistry};

/// Global registry, installed into the process termination hooks when first touched.
static GLOBAL_REGISTRY: LazyLock<Arc<ShutdownRegistry>> = LazyLock::new(|| {
    let config = RegistryConfig::from_env().unwrap_or_else(|e| {
        log::warn!("{}, using the default configuration", e);
        RegistryConfig::default()
    });

    let registry = Arc::new(ShutdownRegistry::with_config(config));
    if let Err(e) = registry.install() {
        log::warn!("Global shutdown hook callbacks will not run at exit: {}", e);
    }
    registry
});

/// Returns the process-wide registry.
pub fn global() -> &'static Arc<ShutdownRegistry> {
    &GLOBAL_REGISTRY
}

/// Adds a callback to the global registry.
///
/// Returns `true` if it was added. See [`ShutdownRegistry::register`].
pub fn add_shutdown_hook_callback(callback: Callback, priority: Priority) -> bool {
    GLOBAL_REGISTRY.register(callback, priority)
}

/// Removes a callback from the global registry.
///
/// Returns `true` if it was pending. See [`ShutdownRegistry::unregister`].
pub fn remove_shutdown_hook_callback(callback: &Callback) -> bool {
    GLOBAL_REGISTRY.unregister(callback)
}

/// Pending callbacks of the global registry, in execution order.
pub fn shutdown_hook_callbacks() -> Vec<PendingCallback> {
    GLOBAL_REGISTRY.snapshot()
}

/// Sets a tracing callback on the global registry.
///
/// # Example
/// ```rust
/// use shutdown_hook_registry::{clear_trace_callback, set_trace_callback};
///
/// set_trace_callback(|event| println!("[shutdown-trace] {}", event));
/// clear_trace_callback();
/// ```
pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
    GLOBAL_REGISTRY.set_trace_callback(callback);
}

/// Clears the tracing callback of the global registry.
pub fn clear_trace_callback() {
    GLOBAL_REGISTRY.clear_trace_callback();
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{shutdown_hook_names, DEFAULT_HOOK_NAME};
    use serial_test::serial;
    use std::sync::Mutex;

    #[test]
    #[serial]
    fn test_global_registry_is_installed() {
        let _ = global();
        assert!(shutdown_hook_names().contains(&DEFAULT_HOOK_NAME.to_string()));
        assert!(!global().is_draining());
    }

    #[test]
    #[serial]
    fn test_add_and_remove_global_callback() {
        let callback: Callback = Arc::new(|| {});

        assert!(add_shutdown_hook_callback(callback.clone(), 3));
        assert!(!add_shutdown_hook_callback(callback.clone(), 3));
        assert!(shutdown_hook_callbacks().iter().any(|e| e.is(&callback)));

        assert!(remove_shutdown_hook_callback(&callback));
        assert!(!remove_shutdown_hook_callback(&callback));
        assert!(!shutdown_hook_callbacks().iter().any(|e| e.is(&callback)));
    }

    #[test]
    #[serial]
    fn test_global_trace_callback() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        set_trace_callback(move |event| {
            events_clone.lock().unwrap().push(event.to_string());
        });

        let callback: Callback = Arc::new(|| {});
        add_shutdown_hook_callback(callback.clone(), -1);
        remove_shutdown_hook_callback(&callback);
        clear_trace_callback();
        add_shutdown_hook_callback(Arc::new(|| {}), 0);

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "register { priority: -1, added: true }",
                "unregister { removed: true }"
            ]
        );
    }
}
