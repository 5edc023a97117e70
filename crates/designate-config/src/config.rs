//! Root configuration type and its builder.

use serde::{Deserialize, Serialize};

use crate::{AuthStrategy, ConfigError, LoggingConfig, ServiceApiConfig};
use designate_telemetry::LogFormat;

/// Complete API pipeline configuration.
///
/// Immutable once loaded. Each pipeline stage receives the values it needs
/// at construction.
///
/// # Example
///
/// ```
/// use designate_config::DesignateConfig;
///
/// let config = DesignateConfig::default();
/// assert!(!config.service_api.maintenance_mode);
/// assert_eq!(config.service_api.maintenance_mode_role, "admin");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DesignateConfig {
    /// API service settings.
    #[serde(default)]
    pub service_api: ServiceApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DesignateConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> DesignateConfigBuilder {
        DesignateConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The maintenance bypass role is empty
    /// - The notification timeout or queue size is zero
    /// - The log level is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_api.maintenance_mode_role.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "service_api.maintenance-mode-role",
                "must not be empty",
            ));
        }

        if self.service_api.notification_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "service_api.notification-timeout-ms",
                "must be greater than zero",
            ));
        }

        if self.service_api.notification_queue_size == 0 {
            return Err(ConfigError::invalid_value(
                "service_api.notification-queue-size",
                "must be greater than zero",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Pretty log formatting with ANSI colors
    /// - Debug log level
    /// - No-auth context strategy
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;

        config.service_api.auth_strategy = AuthStrategy::NoAuth;

        config
    }

    /// Create a production configuration preset.
    ///
    /// - JSON log formatting at info level
    /// - Trusted-identity context strategy
    /// - Fault notifications enabled
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;

        config.service_api.auth_strategy = AuthStrategy::Keystone;
        config.service_api.notify_api_faults = true;

        config
    }
}

/// Builder for [`DesignateConfig`].
#[derive(Debug, Default)]
pub struct DesignateConfigBuilder {
    service_api: Option<ServiceApiConfig>,
    logging: Option<LoggingConfig>,
}

impl DesignateConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service API section.
    #[must_use]
    pub fn service_api(mut self, service_api: ServiceApiConfig) -> Self {
        self.service_api = Some(service_api);
        self
    }

    /// Set the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> DesignateConfig {
        DesignateConfig {
            service_api: self.service_api.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<DesignateConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
