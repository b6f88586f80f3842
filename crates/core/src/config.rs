use serde::Deserialize;

use crate::error::{PopupError, PopupResult};

/// Root application configuration. Loaded from environment variables
/// with the prefix `POPUP_ENGINE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// Seed a handful of demo campaigns at startup (development only).
    #[serde(default)]
    pub seed_demo_data: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            delivery: DeliveryConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> PopupResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("POPUP_ENGINE")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder
            .build()
            .map_err(|e| PopupError::Config(e.to_string()))?;
        config
            .try_deserialize()
            .map_err(|e| PopupError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.http_port, 8080);
        assert!(!config.delivery.seed_demo_data);
    }

    #[test]
    fn test_load_surfaces_config_error() {
        std::env::set_var("POPUP_ENGINE__API__HTTP_PORT", "not-a-port");
        let err = AppConfig::load().unwrap_err();
        assert!(matches!(err, PopupError::Config(_)));
        assert!(err.to_string().contains("Configuration error"));
        std::env::remove_var("POPUP_ENGINE__API__HTTP_PORT");
    }
}
