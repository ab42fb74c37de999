use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::analysis::config::MAX_STALE_AFTER_DAYS;
use crate::analysis::AnalysisConfig;

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
    pub analysis: AnalysisConfig,
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
            analysis: load_analysis_config()?,
        })
    }
}

/// `APP_ANALYSIS_CONFIG` names an optional JSON file; `APP_STALE_AFTER_DAYS` overrides its window.
fn load_analysis_config() -> Result<AnalysisConfig, ConfigError> {
    let mut analysis = match env::var("APP_ANALYSIS_CONFIG") {
        Ok(path) if !path.trim().is_empty() => {
            let path = PathBuf::from(path.trim());
            let contents = fs::read_to_string(&path).map_err(|source| {
                ConfigError::AnalysisFile {
                    path: path.clone(),
                    source,
                }
            })?;
            serde_json::from_str(&contents)
                .map_err(|source| ConfigError::AnalysisFormat { path, source })?
        }
        _ => AnalysisConfig::default(),
    };

    if let Ok(days) = env::var("APP_STALE_AFTER_DAYS") {
        analysis.stale_after_days = days
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidStaleWindow)?;
    }

    if !analysis.has_valid_stale_window() {
        return Err(ConfigError::InvalidStaleWindow);
    }

    Ok(analysis)
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStaleWindow,
    AnalysisFile { path: PathBuf, source: std::io::Error },
    AnalysisFormat { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStaleWindow => {
                write!(
                    f,
                    "stale window must be a whole number of days between 0 and {}",
                    MAX_STALE_AFTER_DAYS
                )
            }
            ConfigError::AnalysisFile { path, .. } => {
                write!(f, "unable to read analysis config {}", path.display())
            }
            ConfigError::AnalysisFormat { path, .. } => {
                write!(f, "analysis config {} is not valid JSON", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidStaleWindow => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::AnalysisFile { source, .. } => Some(source),
            ConfigError::AnalysisFormat { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::config::DEFAULT_STALE_AFTER_DAYS;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_ANALYSIS_CONFIG");
        env::remove_var("APP_STALE_AFTER_DAYS");
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
        assert_eq!(config.analysis, AnalysisConfig::default());
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
    fn stale_window_override_is_applied() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_STALE_AFTER_DAYS", "90");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.analysis.stale_after_days, 90);
        assert_ne!(config.analysis.stale_after_days, DEFAULT_STALE_AFTER_DAYS);
    }

    #[test]
    fn negative_stale_window_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_STALE_AFTER_DAYS", "-3");
        match AppConfig::load() {
            Err(ConfigError::InvalidStaleWindow) => {}
            other => panic!("expected stale window error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn oversized_stale_window_is_rejected_from_env_and_file() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_STALE_AFTER_DAYS", "200000000000");
        match AppConfig::load() {
            Err(ConfigError::InvalidStaleWindow) => {}
            other => panic!("expected stale window error, got {other:?}"),
        }

        reset_env();
        let path = env::temp_dir().join(format!("miso-stale-{}.json", std::process::id()));
        fs::write(&path, r#"{ "stale_after_days": 200000000000 }"#).expect("write config file");
        env::set_var("APP_ANALYSIS_CONFIG", &path);
        match AppConfig::load() {
            Err(ConfigError::InvalidStaleWindow) => {}
            other => panic!("expected stale window error, got {other:?}"),
        }

        fs::remove_file(&path).ok();
        reset_env();
    }

    #[test]
    fn analysis_file_overrides_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = env::temp_dir().join(format!("miso-analysis-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{ "recommendation_limit": 3, "vulnerability": { "neuroticism": 0.5 } }"#,
        )
        .expect("write config file");
        env::set_var("APP_ANALYSIS_CONFIG", &path);

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.analysis.recommendation_limit, 3);
        assert_eq!(config.analysis.vulnerability.neuroticism, 0.5);
        assert_eq!(config.analysis.stale_after_days, DEFAULT_STALE_AFTER_DAYS);

        fs::remove_file(&path).ok();
        reset_env();
    }

    #[test]
    fn missing_analysis_file_is_reported() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ANALYSIS_CONFIG", "/nonexistent/miso-analysis.json");
        match AppConfig::load() {
            Err(ConfigError::AnalysisFile { .. }) => {}
            other => panic!("expected analysis file error, got {other:?}"),
        }
        reset_env();
    }
}
