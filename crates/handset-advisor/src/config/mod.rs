use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub advisory: AdvisoryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            advisory: AdvisoryConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the advisory text generator.
#[derive(Clone)]
pub struct AdvisoryConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    /// Advisory records kept for status polling before the oldest are evicted.
    pub store_capacity: usize,
    /// Generator calls allowed to run at once.
    pub max_in_flight: usize,
}

impl AdvisoryConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-3-flash-preview";
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";
    pub const DEFAULT_STORE_CAPACITY: usize = 1024;
    pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("ADVISORY_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let model = env::var("ADVISORY_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());
        let base_url =
            env::var("ADVISORY_BASE_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("ADVISORY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidAdvisoryTimeout)?;

        let temperature = env::var("ADVISORY_TEMPERATURE")
            .unwrap_or_else(|_| "0.7".to_string())
            .parse::<f32>()
            .ok()
            .filter(|value| (0.0..=2.0).contains(value))
            .ok_or(ConfigError::InvalidAdvisoryTemperature)?;

        let store_capacity = positive_count("ADVISORY_STORE_CAPACITY", Self::DEFAULT_STORE_CAPACITY)?;
        let max_in_flight = positive_count("ADVISORY_MAX_IN_FLIGHT", Self::DEFAULT_MAX_IN_FLIGHT)?;

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout_secs,
            temperature,
            store_capacity,
            max_in_flight,
        })
    }
}

fn positive_count(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ConfigError::InvalidAdvisoryLimit { key }),
        Err(_) => Ok(default),
    }
}

impl fmt::Debug for AdvisoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("store_capacity", &self.store_capacity)
            .field("max_in_flight", &self.max_in_flight)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidAdvisoryTimeout,
    InvalidAdvisoryTemperature,
    InvalidAdvisoryLimit { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidAdvisoryTimeout => {
                write!(f, "ADVISORY_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidAdvisoryTemperature => {
                write!(f, "ADVISORY_TEMPERATURE must be a number between 0 and 2")
            }
            ConfigError::InvalidAdvisoryLimit { key } => {
                write!(f, "{key} must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidAdvisoryTimeout
            | ConfigError::InvalidAdvisoryTemperature
            | ConfigError::InvalidAdvisoryLimit { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "ADVISORY_API_KEY",
            "API_KEY",
            "ADVISORY_MODEL",
            "ADVISORY_BASE_URL",
            "ADVISORY_TIMEOUT_SECS",
            "ADVISORY_TEMPERATURE",
            "ADVISORY_STORE_CAPACITY",
            "ADVISORY_MAX_IN_FLIGHT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.advisory.model, AdvisoryConfig::DEFAULT_MODEL);
        assert_eq!(config.advisory.timeout_secs, 20);
        assert!((config.advisory.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.advisory.store_capacity, 1024);
        assert_eq!(config.advisory.max_in_flight, 8);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn advisory_key_falls_back_to_generic_variable() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("API_KEY", "  secret-key ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.advisory.api_key.as_deref(), Some("secret-key"));
        assert!(!format!("{:?}", config.advisory).contains("secret-key"));

        env::set_var("ADVISORY_API_KEY", "");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.advisory.api_key, None);
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADVISORY_TEMPERATURE", "3.5");
        let err = AppConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAdvisoryTemperature));
        reset_env();
    }

    #[test]
    fn rejects_zero_advisory_limits() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADVISORY_MAX_IN_FLIGHT", "0");
        let err = AppConfig::load().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidAdvisoryLimit {
                key: "ADVISORY_MAX_IN_FLIGHT"
            }
        ));

        reset_env();
        env::set_var("ADVISORY_STORE_CAPACITY", "256");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.advisory.store_capacity, 256);
        reset_env();
    }
}
