//! Registry configuration.
//!
//! The only process-level tunable is the soft capacity of the pending callback set,
//! read from [`CAPACITY_ENV`]. Everything else is set through the builder methods.

use crate::RegistryError;

/// Environment variable holding the soft capacity of the pending callback set.
pub const CAPACITY_ENV: &str = "SHUTDOWN_HOOK_CALLBACKS_CAPACITY";

/// Soft capacity used when nothing is configured.
pub const DEFAULT_CAPACITY: usize = 512;

/// Name of the termination hook that drains a registry.
pub const DEFAULT_HOOK_NAME: &str = "shutdown-hook-callbacks";

/// Settings for a [`ShutdownRegistry`](crate::ShutdownRegistry).
///
/// # Examples
///
/// ```rust
/// use shutdown_hook_registry::RegistryConfig;
///
/// let config = RegistryConfig::default()
///     .with_capacity(64)
///     .with_hook_name("db-flush");
///
/// assert_eq!(config.capacity, 64);
/// assert_eq!(config.hook_name, "db-flush");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Soft limit of pending callbacks. Exceeding it is reported, never rejected.
    pub capacity: usize,
    /// Name of the termination hook (and its thread) installed by `install`.
    pub hook_name: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            hook_name: DEFAULT_HOOK_NAME.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidCapacity`] if [`CAPACITY_ENV`] is set but is not a
    ///   positive integer
    pub fn from_env() -> Result<Self, RegistryError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but resolves variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RegistryError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(CAPACITY_ENV) {
            config.capacity = parse_capacity(&raw)?;
        }
        Ok(config)
    }

    /// Sets the soft capacity of the pending callback set.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the name of the termination hook installed by `install`.
    pub fn with_hook_name(mut self, hook_name: impl Into<String>) -> Self {
        self.hook_name = hook_name.into();
        self
    }
}

fn parse_capacity(raw: &str) -> Result<usize, RegistryError> {
    let capacity = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| RegistryError::InvalidCapacity {
            value: raw.to_string(),
            reason: e.to_string(),
        })?;

    if capacity == 0 {
        return Err(RegistryError::InvalidCapacity {
            value: raw.to_string(),
            reason: "capacity must be at least 1".to_string(),
        });
    }

    Ok(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_with(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            assert_eq!(key, CAPACITY_ENV);
            value.map(str::to_string)
        }
    }

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.capacity, 512);
        assert_eq!(config.hook_name, "shutdown-hook-callbacks");
    }

    #[test]
    fn test_unset_variable_uses_default() {
        let config = RegistryConfig::from_lookup(lookup_with(None)).unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_capacity_from_variable() {
        let config = RegistryConfig::from_lookup(lookup_with(Some(" 1024 "))).unwrap();
        assert_eq!(config.capacity, 1024);
        assert_eq!(config.hook_name, DEFAULT_HOOK_NAME);
    }

    #[test]
    fn test_non_numeric_capacity_is_rejected() {
        let err = RegistryConfig::from_lookup(lookup_with(Some("lots"))).unwrap_err();
        match err {
            RegistryError::InvalidCapacity { value, .. } => assert_eq!(value, "lots"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = RegistryConfig::from_lookup(lookup_with(Some("0"))).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_negative_capacity_is_rejected() {
        assert!(RegistryConfig::from_lookup(lookup_with(Some("-4"))).is_err());
    }
}
