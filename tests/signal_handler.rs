//! Integration test for the termination signal bridge.

#![cfg(feature = "signals")]

use shutdown_hook_registry::{install_default_signal_handler, install_signal_handler, RegistryError};

#[test]
fn test_signal_handler_installs_once() {
    install_default_signal_handler().unwrap();

    let err = install_signal_handler(1).unwrap_err();
    assert!(matches!(err, RegistryError::SignalHandler(_)));
    assert!(err
        .to_string()
        .starts_with("Failed to install the termination signal handler"));
}
