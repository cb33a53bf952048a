//! End-to-end test: callbacks registered on the global registry run when the
//! process exits.
//!
//! The test re-runs this test binary as a child process, filtered down to
//! `child_process_entry`. The child registers callbacks that append to a file and then
//! simply finishes; the exit handler drains the registry.

#![cfg(unix)]

use shutdown_hook_registry::{add_shutdown_hook_callback, Callback};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

const OUTPUT_ENV: &str = "SHUTDOWN_HOOK_REGISTRY_CHILD_OUTPUT";

fn appending(path: PathBuf, line: &'static str) -> Callback {
    Arc::new(move || {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .unwrap();
        writeln!(file, "{}", line).unwrap();
    })
}

#[test]
fn child_process_entry() {
    // Only does something when spawned by `test_callbacks_run_at_process_exit`
    let Some(path) = std::env::var_os(OUTPUT_ENV).map(PathBuf::from) else {
        return;
    };

    assert!(add_shutdown_hook_callback(appending(path.clone(), "A"), 10));
    assert!(add_shutdown_hook_callback(appending(path.clone(), "B"), 1));
    assert!(add_shutdown_hook_callback(appending(path.clone(), "C"), 5));
    assert!(add_shutdown_hook_callback(
        Arc::new(|| panic!("failing callback during exit")),
        7
    ));
}

#[test]
fn test_callbacks_run_at_process_exit() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("drain-order.txt");

    let status = Command::new(std::env::current_exe().unwrap())
        .args(["child_process_entry", "--exact", "--test-threads=1"])
        .env(OUTPUT_ENV, &output)
        .status()
        .unwrap();
    assert!(status.success());

    let written = std::fs::read_to_string(&output).unwrap();
    // The panicking callback (priority 7) does not stop A (priority 10)
    assert_eq!(written.lines().collect::<Vec<_>>(), vec!["B", "C", "A"]);
}
