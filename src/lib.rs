//! # Shutdown Hook Registry
//!
//! A thread-safe registry of callbacks that run exactly once, in priority order,
//! when the process exits.
//!
//! Callbacks are registered from any thread with a priority (lower runs first, ties
//! in registration order). At exit the registry is drained on a dedicated thread:
//! every pending callback runs sequentially, a panicking callback is logged and
//! skipped over, and the registry is left empty.
//!
//! ## Quick Start
//!
//! ```rust
//! use shutdown_hook_registry::{add_shutdown_hook_callback, Callback};
//! use std::sync::Arc;
//!
//! let close_db: Callback = Arc::new(|| println!("closing database"));
//! let flush_logs: Callback = Arc::new(|| println!("flushing logs"));
//!
//! // Runs at process exit: flush_logs first, then close_db
//! add_shutdown_hook_callback(close_db, 10);
//! add_shutdown_hook_callback(flush_logs, 1);
//! ```
//!
//! ## Features
//!
//! - **Thread-safe**: register, unregister and inspect from any thread
//! - **Ordered**: priority order with stable tie-breaking
//! - **Run once**: the drain happens a single time, late registrations are rejected
//! - **Isolated failures**: one panicking callback never stops the others
//! - **Tracing support**: optional callback receiving every [`RegistryEvent`], plus
//!   `log` output
//!
//! ## Main Items
//!
//! - [`ShutdownRegistry`] - an independent registry (handy in tests)
//! - [`add_shutdown_hook_callback`] / [`remove_shutdown_hook_callback`] - the global registry
//! - [`shutdown_hook_callbacks`] - pending callbacks of the global registry
//! - [`ShutdownHooks`] / [`shutdown_hook_names`] - named process termination hooks
//! - [`install_signal_handler`] - run the hooks on SIGINT/SIGTERM (feature `signals`)

mod callback_registry;
mod registry;
mod registry_callback;
mod registry_config;
mod registry_error;
mod registry_event;
mod shutdown_hooks;
#[cfg(feature = "signals")]
mod signals;

pub use callback_registry::{DrainReport, ShutdownRegistry, TraceCallback};
pub use registry::{
    add_shutdown_hook_callback, clear_trace_callback, global, remove_shutdown_hook_callback,
    set_trace_callback, shutdown_hook_callbacks,
};
pub use registry_callback::{
    Callback, PendingCallback, Priority, HIGHEST_PRECEDENCE, LOWEST_PRECEDENCE, NORMAL_PRIORITY,
};
pub use registry_config::{RegistryConfig, CAPACITY_ENV, DEFAULT_CAPACITY, DEFAULT_HOOK_NAME};
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use shutdown_hooks::{
    add_shutdown_hook, filter_shutdown_hooks, remove_shutdown_hook, shutdown_hook_names,
    ShutdownHooks,
};
#[cfg(feature = "signals")]
pub use signals::{install_default_signal_handler, install_signal_handler, DEFAULT_SIGNAL_EXIT_CODE};
