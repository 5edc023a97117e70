//! Configuration schema types.

use designate_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Which context strategy builds the request context.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthStrategy {
    /// Trust identity headers asserted by the identity-verification proxy.
    #[default]
    Keystone,
    /// Fixed fallback identity, for deployments without identity
    /// verification.
    #[serde(rename = "noauth")]
    NoAuth,
    /// Fixed test identity, overridable per request. Never for production.
    Test,
}

impl AuthStrategy {
    /// Returns the configuration name of the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keystone => "keystone",
            Self::NoAuth => "noauth",
            Self::Test => "test",
        }
    }
}

impl std::str::FromStr for AuthStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keystone" => Ok(Self::Keystone),
            "noauth" => Ok(Self::NoAuth),
            "test" => Ok(Self::Test),
            _ => Err(format!(
                "unknown auth strategy '{s}', expected 'keystone', 'noauth' or 'test'"
            )),
        }
    }
}

impl std::fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `[service_api]` section.
///
/// # Example
///
/// ```
/// use designate_config::{AuthStrategy, ServiceApiConfig};
///
/// let config: ServiceApiConfig = toml::from_str(r#"
///     maintenance-mode = true
///     auth-strategy = "noauth"
/// "#).unwrap();
///
/// assert!(config.maintenance_mode);
/// assert_eq!(config.maintenance_mode_role, "admin");
/// assert_eq!(config.auth_strategy, AuthStrategy::NoAuth);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ServiceApiConfig {
    /// Reject requests with 503 unless the caller holds the bypass role.
    #[serde(default)]
    pub maintenance_mode: bool,

    /// Role that bypasses maintenance mode.
    #[serde(default = "default_maintenance_role")]
    pub maintenance_mode_role: String,

    /// Context strategy.
    #[serde(default)]
    pub auth_strategy: AuthStrategy,

    /// Emit a notification for every rendered fault.
    #[serde(default)]
    pub notify_api_faults: bool,

    /// Upper bound on a single notification delivery, in milliseconds.
    #[serde(default = "default_notification_timeout_ms")]
    pub notification_timeout_ms: u64,

    /// Capacity of the pending-notification queue.
    #[serde(default = "default_notification_queue_size")]
    pub notification_queue_size: usize,
}

impl Default for ServiceApiConfig {
    fn default() -> Self {
        Self {
            maintenance_mode: false,
            maintenance_mode_role: default_maintenance_role(),
            auth_strategy: AuthStrategy::default(),
            notify_api_faults: false,
            notification_timeout_ms: default_notification_timeout_ms(),
            notification_queue_size: default_notification_queue_size(),
        }
    }
}

fn default_maintenance_role() -> String {
    "admin".to_string()
}

fn default_notification_timeout_ms() -> u64 {
    5000
}

fn default_notification_queue_size() -> usize {
    1024
}

/// The `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` directive).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts the section into the logging setup used by
    /// [`designate_telemetry::init_logging`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            ansi_enabled: self.ansi_enabled,
            include_location: self.include_location,
            ..LogConfig::default()
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_api_defaults() {
        let config = ServiceApiConfig::default();
        assert!(!config.maintenance_mode);
        assert_eq!(config.maintenance_mode_role, "admin");
        assert_eq!(config.auth_strategy, AuthStrategy::Keystone);
        assert!(!config.notify_api_faults);
        assert_eq!(config.notification_timeout_ms, 5000);
        assert_eq!(config.notification_queue_size, 1024);
    }

    #[test]
    fn test_service_api_kebab_case_keys() {
        let toml = r#"
            maintenance-mode = true
            maintenance-mode-role = "operator"
            notify-api-faults = true
        "#;
        let config: ServiceApiConfig = toml::from_str(toml).unwrap();
        assert!(config.maintenance_mode);
        assert_eq!(config.maintenance_mode_role, "operator");
        assert!(config.notify_api_faults);
    }

    #[test]
    fn test_service_api_unknown_field_rejected() {
        let result: Result<ServiceApiConfig, _> = toml::from_str("maintenance_mode = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_auth_strategy_names() {
        for strategy in [AuthStrategy::Keystone, AuthStrategy::NoAuth, AuthStrategy::Test] {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{strategy}\""));
            assert_eq!(strategy.as_str().parse::<AuthStrategy>().unwrap(), strategy);
        }
        assert!("ldap".parse::<AuthStrategy>().is_err());
    }

    #[test]
    fn test_logging_to_log_config() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            ..Default::default()
        };
        let log_config = logging.to_log_config();
        assert_eq!(log_config.level, "debug");
        assert_eq!(log_config.format, LogFormat::Pretty);
        assert!(log_config.include_location);
        assert!(log_config.include_target);
    }
}
