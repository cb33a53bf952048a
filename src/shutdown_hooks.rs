//! Process termination hooks.
//!
//! A [`ShutdownHooks`] table holds named, run-once hooks. When the table runs, every
//! hook gets its own thread (named after the hook) and the table waits for all of them.
//!
//! One table is process-wide. It is created by the first [`add_shutdown_hook`] call,
//! which also registers a `libc::atexit` handler, so the table runs when `main` returns
//! or `std::process::exit` is called. The drain of every installed
//! [`ShutdownRegistry`](crate::ShutdownRegistry) is one hook in that table.

use std::sync::{Mutex, OnceLock};
use std::thread;

use crate::callback_registry::panic_message;
use crate::RegistryError;

type Hook = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct HookTable {
    hooks: Vec<(String, Hook)>,
    running: bool,
}

/// A table of named termination hooks that runs at most once.
///
/// # Examples
///
/// ```rust
/// use shutdown_hook_registry::ShutdownHooks;
///
/// let hooks = ShutdownHooks::new();
/// hooks.add("flush-metrics", || println!("flushing")).unwrap();
/// hooks.add("close-sockets", || println!("closing")).unwrap();
///
/// assert_eq!(hooks.names(), vec!["flush-metrics", "close-sockets"]);
/// assert_eq!(hooks.run(), 2);
/// assert_eq!(hooks.run(), 0);
/// ```
#[derive(Default)]
pub struct ShutdownHooks {
    table: Mutex<HookTable>,
}

impl ShutdownHooks {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hook under `name`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::HookAlreadyRegistered`] if a hook with the same name is present
    /// - [`RegistryError::ShutdownInProgress`] if the table already ran
    pub fn add(
        &self,
        name: impl Into<String>,
        hook: impl FnOnce() + Send + 'static,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut table = self.table.lock().unwrap_or_else(|p| p.into_inner());

        if table.running {
            return Err(RegistryError::ShutdownInProgress);
        }
        if table.hooks.iter().any(|(existing, _)| *existing == name) {
            return Err(RegistryError::HookAlreadyRegistered { name });
        }

        log::debug!("Shutdown hook added: {}", name);
        table.hooks.push((name, Box::new(hook)));
        Ok(())
    }

    /// Removes the hook registered under `name`. Returns `false` if there is none or
    /// the table already ran.
    pub fn remove(&self, name: &str) -> bool {
        !self.filter(|candidate| candidate == name, true).is_empty()
    }

    /// Names of the registered hooks, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.filter(|_| true, false)
    }

    /// Names of the hooks accepted by `predicate`, in registration order.
    ///
    /// With `remove` set, the selected hooks are also taken out of the table and will
    /// not run.
    pub fn filter(&self, predicate: impl Fn(&str) -> bool, remove: bool) -> Vec<String> {
        let mut table = self.table.lock().unwrap_or_else(|p| p.into_inner());

        if !remove {
            return table
                .hooks
                .iter()
                .map(|(name, _)| name)
                .filter(|name| predicate(name))
                .cloned()
                .collect();
        }

        let (selected, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut table.hooks)
            .into_iter()
            .partition(|(name, _)| predicate(name));
        table.hooks = kept;

        selected
            .into_iter()
            .map(|(name, _)| {
                log::debug!("Shutdown hook removed: {}", name);
                name
            })
            .collect()
    }

    /// Returns `true` once [`run`](Self::run) has been called.
    pub fn is_running(&self) -> bool {
        self.table.lock().unwrap_or_else(|p| p.into_inner()).running
    }

    /// Runs every hook on its own thread and waits for all of them.
    ///
    /// Only the first call runs anything. Returns the number of hooks started. A hook
    /// that panics is logged and does not affect the others.
    pub fn run(&self) -> usize {
        let hooks = {
            let mut table = self.table.lock().unwrap_or_else(|p| p.into_inner());
            if table.running {
                return 0;
            }
            table.running = true;
            std::mem::take(&mut table.hooks)
        };

        let mut handles = Vec::with_capacity(hooks.len());
        for (name, hook) in hooks {
            match thread::Builder::new().name(name.clone()).spawn(hook) {
                Ok(handle) => handles.push((name, handle)),
                Err(e) => log::error!("Failed to start shutdown hook {}: {}", name, e),
            }
        }

        let started = handles.len();
        for (name, handle) in handles {
            if let Err(payload) = handle.join() {
                log::error!(
                    "Shutdown hook {} panicked: {}",
                    name,
                    panic_message(payload.as_ref())
                );
            }
        }
        started
    }
}

impl std::fmt::Debug for ShutdownHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownHooks")
            .field("names", &self.names())
            .field("running", &self.is_running())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Process-wide table
// -------------------------------------------------------------------------------------------------

static PROCESS_HOOKS: OnceLock<ShutdownHooks> = OnceLock::new();

/// Whether `libc::atexit` accepted the trampoline. Decided once.
static AT_EXIT_REGISTERED: OnceLock<bool> = OnceLock::new();

extern "C" fn run_process_hooks() {
    if let Some(hooks) = PROCESS_HOOKS.get() {
        let started = hooks.run();
        log::debug!("Process exit ran {} shutdown hook(s)", started);
    }
}

fn process_hooks() -> Result<&'static ShutdownHooks, RegistryError> {
    let hooks = PROCESS_HOOKS.get_or_init(ShutdownHooks::new);

    let registered = *AT_EXIT_REGISTERED.get_or_init(|| {
        // SAFETY: `run_process_hooks` is a plain `extern "C" fn()` with no captured state.
        let rc = unsafe { libc::atexit(run_process_hooks) };
        rc == 0
    });
    if !registered {
        return Err(RegistryError::AtExitRegistration);
    }

    Ok(hooks)
}

/// Adds a hook to the process-wide table, which runs once at process exit.
///
/// # Errors
///
/// - [`RegistryError::AtExitRegistration`] if the exit handler could not be registered
/// - any error of [`ShutdownHooks::add`]
pub fn add_shutdown_hook(
    name: impl Into<String>,
    hook: impl FnOnce() + Send + 'static,
) -> Result<(), RegistryError> {
    process_hooks()?.add(name, hook)
}

/// Removes a hook from the process-wide table.
pub fn remove_shutdown_hook(name: &str) -> bool {
    PROCESS_HOOKS.get().is_some_and(|hooks| hooks.remove(name))
}

/// Names of the hooks in the process-wide table.
///
/// Best effort: returns an empty list if the table was never created.
pub fn shutdown_hook_names() -> Vec<String> {
    filter_shutdown_hooks(|_| true, false)
}

/// Selects (and optionally removes) hooks from the process-wide table by name.
///
/// Best effort: returns an empty list if the table was never created.
pub fn filter_shutdown_hooks(predicate: impl Fn(&str) -> bool, remove: bool) -> Vec<String> {
    match PROCESS_HOOKS.get() {
        Some(hooks) => hooks.filter(predicate, remove),
        None => Vec::new(),
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
