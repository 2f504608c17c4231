//! Runtime configuration for audit stamping.

use tracing::debug;

/// Environment variable that disables stamping process-wide.
pub const DISABLED_ENV_VAR: &str = "AUDITSTAMP_DISABLED";

/// Configuration consulted when hooks are created for a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditConfig {
    /// When set, no hooks are created and nothing is stamped.
    pub disabled: bool,
}

impl AuditConfig {
    /// Read configuration from the environment.
    ///
    /// `AUDITSTAMP_DISABLED=1` (or `true`/`yes`) turns stamping off entirely.
    pub fn from_env() -> Self {
        let disabled = std::env::var(DISABLED_ENV_VAR)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        if disabled {
            debug!("audit stamping disabled via {DISABLED_ENV_VAR}");
        }

        Self { disabled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_is_enabled() {
        std::env::remove_var(DISABLED_ENV_VAR);
        assert!(!AuditConfig::from_env().disabled);
        assert!(!AuditConfig::default().disabled);
    }

    #[test]
    #[serial]
    fn test_env_var_disables() {
        for value in ["1", "true", "TRUE", "yes"] {
            std::env::set_var(DISABLED_ENV_VAR, value);
            assert!(AuditConfig::from_env().disabled, "value: {value}");
        }
        std::env::remove_var(DISABLED_ENV_VAR);
    }

    #[test]
    #[serial]
    fn test_other_values_do_not_disable() {
        std::env::set_var(DISABLED_ENV_VAR, "0");
        assert!(!AuditConfig::from_env().disabled);
        std::env::remove_var(DISABLED_ENV_VAR);
    }
}
