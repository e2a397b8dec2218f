use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub scraper: ScraperSettings,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Postgres URL. Without one the service keeps offers in memory.
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    #[serde(default = "default_retention_hours")]
    pub retention_hours: i64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            retention_hours: default_retention_hours(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScraperSettings {
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_round_trip_probability")]
    pub round_trip_probability: f64,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            round_trip_probability: default_round_trip_probability(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    /// Classifier is only used when a key is present.
    pub api_key: Option<String>,
    #[serde(default = "default_validation_base_url")]
    pub base_url: String,
    #[serde(default = "default_validation_model")]
    pub model: String,
    #[serde(default = "default_validation_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_validation_base_url(),
            model: default_validation_model(),
            timeout_seconds: default_validation_timeout_seconds(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Comma separated; `*` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { origins: default_cors_origins() }
    }
}

fn default_max_connections() -> u32 { 5 }
fn default_interval_seconds() -> u64 { 3600 }
fn default_retention_hours() -> i64 { 24 }
fn default_request_delay_ms() -> u64 { 250 }
fn default_round_trip_probability() -> f64 { 0.4 }
fn default_validation_base_url() -> String { "https://api.openai.com/v1".to_string() }
fn default_validation_model() -> String { "gpt-4o-mini".to_string() }
fn default_validation_timeout_seconds() -> u64 { 10 }
fn default_cors_origins() -> String { "*".to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `VOLO_DATABASE__URL=postgres://...`
            .add_source(config::Environment::with_prefix("VOLO").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the refresh schedule cannot run with.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.refresh.interval_seconds == 0 {
            return Err(config::ConfigError::Message(
                "refresh.interval_seconds must be greater than 0".to_string(),
            ));
        }
        if self.refresh.retention_hours <= 0 || self.refresh.retention().is_none() {
            return Err(config::ConfigError::Message(format!(
                "refresh.retention_hours must be a positive number of hours, got {}",
                self.refresh.retention_hours
            )));
        }
        Ok(())
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_seconds)
    }

    /// `None` when the hour count does not fit a duration.
    pub fn retention(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_hours(self.retention_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let s = config::Config::builder()
            .set_override("server.port", 8001)
            .unwrap()
            .build()
            .unwrap();
        let config: Config = s.try_deserialize().unwrap();

        assert_eq!(config.server.port, 8001);
        assert!(config.database.url.is_none());
        assert_eq!(config.refresh.interval_seconds, 3600);
        assert_eq!(config.refresh.retention_hours, 24);
        assert!(config.validation.api_key.is_none());
        assert_eq!(config.cors.origins, "*");
        assert!(config.validate().is_ok());
    }

    fn with_refresh(interval_seconds: i64, retention_hours: i64) -> Config {
        config::Config::builder()
            .set_override("server.port", 8001)
            .unwrap()
            .set_override("refresh.interval_seconds", interval_seconds)
            .unwrap()
            .set_override("refresh.retention_hours", retention_hours)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let settings = with_refresh(0, 24);
        assert!(matches!(settings.validate(), Err(config::ConfigError::Message(_))));
    }

    #[test]
    fn test_retention_must_be_positive_and_in_range() {
        assert!(with_refresh(3600, 0).validate().is_err());
        assert!(with_refresh(3600, -5).validate().is_err());
        assert!(with_refresh(3600, i64::MAX).validate().is_err());

        let config = with_refresh(60, 48);
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh.interval(), std::time::Duration::from_secs(60));
        assert_eq!(config.refresh.retention(), Some(chrono::Duration::hours(48)));
    }
}
