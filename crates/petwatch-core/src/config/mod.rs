//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod ingest;
pub mod logging;
pub mod notification;
pub mod push;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::ingest::{IngestConfig, RateLimitConfig};
pub use self::logging::LoggingConfig;
pub use self::notification::NotificationConfig;
pub use self::push::PushConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Bearer token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Sighting submission settings.
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Zone-match notification settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Push gateway settings.
    #[serde(default)]
    pub push: PushConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `PETWATCH__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PETWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let cfg: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.url.trim().is_empty() {
            return Err(AppError::configuration("database.url must be set"));
        }
        if self.ingest.rate_limit.max_per_window == 0 {
            return Err(AppError::configuration(
                "ingest.rate_limit.max_per_window must be at least 1",
            ));
        }
        if self.ingest.rate_limit.window_seconds == 0 {
            return Err(AppError::configuration(
                "ingest.rate_limit.window_seconds must be at least 1",
            ));
        }
        if self.worker.concurrency == 0 {
            return Err(AppError::configuration("worker.concurrency must be at least 1"));
        }
        if self.worker.retry_max_seconds > worker::MAX_WORKER_DELAY_SECONDS {
            return Err(AppError::configuration(format!(
                "worker.retry_max_seconds must be at most {}",
                worker::MAX_WORKER_DELAY_SECONDS
            )));
        }
        if self.worker.stale_job_after_seconds > worker::MAX_WORKER_DELAY_SECONDS {
            return Err(AppError::configuration(format!(
                "worker.stale_job_after_seconds must be at most {}",
                worker::MAX_WORKER_DELAY_SECONDS
            )));
        }
        if self.push.enabled && self.push.gateway_url.trim().is_empty() {
            return Err(AppError::configuration(
                "push.gateway_url must be set when push is enabled",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.database.url = "postgres://localhost/petwatch".to_string();
        cfg
    }

    #[test]
    fn test_defaults_validate() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_database_url_rejected() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut cfg = valid();
        cfg.ingest.rate_limit.window_seconds = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_unbounded_worker_delays_rejected() {
        let mut cfg = valid();
        cfg.worker.retry_max_seconds = u64::MAX;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.worker.stale_job_after_seconds = u64::MAX;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_push_enabled_requires_gateway() {
        let mut cfg = valid();
        cfg.push.enabled = true;
        cfg.push.gateway_url.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[database]\nurl = \"postgres://db/petwatch\"\n[ingest.rate_limit]\nmax_per_window = 3\n",
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("config should parse");

        assert_eq!(cfg.ingest.rate_limit.max_per_window, 3);
        assert_eq!(cfg.ingest.rate_limit.window_seconds, 86_400);
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.logging.format, "json");
    }
}
