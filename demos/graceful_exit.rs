//! Graceful exit example for shutdown-hook-registry.
//!
//! A worker loop that only stops on Ctrl+C (or SIGTERM). The signal handler turns
//! the signal into `std::process::exit`, so the registered callbacks still run.
//!
//! Run with: `RUST_LOG=debug cargo run --example graceful_exit`, then press Ctrl+C.

use shutdown_hook_registry::{
    add_shutdown_hook_callback, install_default_signal_handler, Callback, RegistryError,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), RegistryError> {
    env_logger::init();
    install_default_signal_handler()?;

    let processed = Arc::new(AtomicU64::new(0));

    let report_processed = processed.clone();
    let report: Callback = Arc::new(move || {
        println!(
            "processed {} item(s) before shutdown",
            report_processed.load(Ordering::SeqCst)
        );
    });
    let checkpoint: Callback = Arc::new(|| println!("writing checkpoint"));

    add_shutdown_hook_callback(checkpoint, 0);
    add_shutdown_hook_callback(report, 1);

    println!("working... press Ctrl+C to stop");
    loop {
        processed.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
    }
}
