//! Basic usage example for shutdown-hook-registry.
//!
//! Demonstrates:
//! - Registering callbacks with priorities on the global registry
//! - Inspecting pending callbacks with `shutdown_hook_callbacks()`
//! - Removing a callback before exit
//! - Watching the registry through a trace callback
//!
//! Run with: `RUST_LOG=trace cargo run --example basic_usage`

use shutdown_hook_registry::{
    add_shutdown_hook_callback, remove_shutdown_hook_callback, set_trace_callback,
    shutdown_hook_callbacks, shutdown_hook_names, Callback, HIGHEST_PRECEDENCE,
    LOWEST_PRECEDENCE,
};
use std::sync::Arc;

fn main() {
    env_logger::init();
    println!("=== shutdown-hook-registry: Basic Usage ===\n");

    set_trace_callback(|event| println!("   [trace] {}", event));

    // -------------------------------------------------------------------------
    // 1. Register callbacks
    // -------------------------------------------------------------------------
    println!("1. Registering callbacks...");

    let close_db: Callback = Arc::new(|| println!("   closing database connections"));
    let flush_logs: Callback = Arc::new(|| println!("   flushing log buffers"));
    let goodbye: Callback = Arc::new(|| println!("   goodbye"));
    let temp_files: Callback = Arc::new(|| println!("   removing temp files"));

    add_shutdown_hook_callback(close_db, 10);
    add_shutdown_hook_callback(flush_logs, HIGHEST_PRECEDENCE);
    add_shutdown_hook_callback(goodbye, LOWEST_PRECEDENCE);
    add_shutdown_hook_callback(temp_files.clone(), 20);

    // -------------------------------------------------------------------------
    // 2. Inspect
    // -------------------------------------------------------------------------
    println!("\n2. Pending callbacks in execution order:");
    for entry in shutdown_hook_callbacks() {
        println!(
            "   priority {:>11}, sequence {}",
            entry.priority(),
            entry.sequence()
        );
    }
    println!("   process hooks: {:?}", shutdown_hook_names());

    // -------------------------------------------------------------------------
    // 3. Remove one
    // -------------------------------------------------------------------------
    println!("\n3. Removing the temp files callback...");
    println!(
        "   removed = {}",
        remove_shutdown_hook_callback(&temp_files)
    );

    // -------------------------------------------------------------------------
    // 4. Exit
    // -------------------------------------------------------------------------
    println!("\n4. Returning from main, the registry drains now:");
}
