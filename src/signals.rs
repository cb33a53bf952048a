//! Termination signal bridge.
//!
//! SIGINT and SIGTERM (Ctrl+C / Ctrl+Break on Windows) normally kill the process
//! without running exit handlers. [`install_signal_handler`] turns them into an
//! orderly `std::process::exit`, so the termination hooks and every installed
//! registry drain still run.

use crate::RegistryError;

/// Exit code used by [`install_default_signal_handler`] (128 + SIGINT).
pub const DEFAULT_SIGNAL_EXIT_CODE: i32 = 130;

/// Exits the process with `exit_code` when a termination signal arrives.
///
/// Only one handler can be installed per process.
///
/// # Errors
///
/// - [`RegistryError::SignalHandler`] if a handler is already installed or the
///   platform refused it
pub fn install_signal_handler(exit_code: i32) -> Result<(), RegistryError> {
    ctrlc::try_set_handler(move || {
        log::info!("Received termination signal, running shutdown hooks...");
        std::process::exit(exit_code);
    })?;
    Ok(())
}

/// [`install_signal_handler`] with [`DEFAULT_SIGNAL_EXIT_CODE`].
pub fn install_default_signal_handler() -> Result<(), RegistryError> {
    install_signal_handler(DEFAULT_SIGNAL_EXIT_CODE)
}
