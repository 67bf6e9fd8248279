// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, DataConfig, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

impl Config {
    /// Load configuration from "config.toml" (optional) plus `FEED`-prefixed
    /// environment variables, with built-in defaults for every key.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("FEED"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5001)?
            .set_default("data.csv_path", "data/sensor_data.csv")?
            .set_default("data.bulk_min", 3)?
            .set_default("data.bulk_max", 7)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "SensorFeed/0.1")?
            .set_default("http.enable_cors", false)?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject batch ranges the data service cannot draw from.
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.data.bulk_min == 0 {
            return Err(config::ConfigError::Message(
                "data.bulk_min must be at least 1".to_string(),
            ));
        }
        if self.data.bulk_min > self.data.bulk_max {
            return Err(config::ConfigError::Message(format!(
                "data.bulk_min ({}) must not exceed data.bulk_max ({})",
                self.data.bulk_min, self.data.bulk_max
            )));
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_a_config_file() {
        let cfg = Config::load_from("definitely-missing-config").expect("defaults");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 5001);
        assert_eq!(cfg.data.csv_path, "data/sensor_data.csv");
        assert_eq!(cfg.data.bulk_min, 3);
        assert_eq!(cfg.data.bulk_max, 7);
        assert!(cfg.logging.access_log);
        assert!(cfg.health.enabled);
        assert_eq!(cfg.health.liveness_path, "/healthz");
        assert_eq!(cfg.health.readiness_path, "/readyz");
    }

    #[test]
    fn socket_addr_parses_from_defaults() {
        let cfg = Config::load_from("definitely-missing-config").expect("defaults");
        let addr = cfg.get_socket_addr().expect("addr");
        assert_eq!(addr.port(), 5001);
    }

    #[test]
    fn validation_rejects_inverted_bulk_range() {
        let mut cfg = Config::load_from("definitely-missing-config").expect("defaults");
        cfg.data.bulk_min = 9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_bulk_min() {
        let mut cfg = Config::load_from("definitely-missing-config").expect("defaults");
        cfg.data.bulk_min = 0;
        assert!(cfg.validate().is_err());
    }
}
