use thiserror::Error;

/// Errors from the fallible setup operations: configuration, hook installation and
/// signal wiring.
///
/// Registering, unregistering and draining callbacks never fail with an error; they
/// report through their return values and the trace callback instead.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid shutdown hook callbacks capacity {value:?}: {reason}")]
    InvalidCapacity { value: String, reason: String },

    #[error("Shutdown hook already registered: {name}")]
    HookAlreadyRegistered { name: String },

    #[error("Shutdown in progress")]
    ShutdownInProgress,

    #[error("Failed to register the process exit handler")]
    AtExitRegistration,

    #[cfg(feature = "signals")]
    #[error("Failed to install the termination signal handler: {0}")]
    SignalHandler(#[from] ctrlc::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_capacity_display() {
        let err = RegistryError::InvalidCapacity {
            value: "abc".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid shutdown hook callbacks capacity \"abc\": invalid digit found in string"
        );
    }

    #[test]
    fn test_hook_already_registered_display() {
        let err = RegistryError::HookAlreadyRegistered {
            name: "shutdown-hook-callbacks".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Shutdown hook already registered: shutdown-hook-callbacks"
        );
    }

    #[test]
    fn test_shutdown_in_progress_display() {
        assert_eq!(
            RegistryError::ShutdownInProgress.to_string(),
            "Shutdown in progress"
        );
    }

    #[test]
    fn test_debug_format() {
        let err = RegistryError::AtExitRegistration;
        assert_eq!(format!("{:?}", err), "AtExitRegistration");
    }

    #[test]
    fn test_error_trait() {
        let err: &dyn std::error::Error = &RegistryError::ShutdownInProgress;
        assert_eq!(err.to_string(), "Shutdown in progress");
    }
}
