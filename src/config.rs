use std::{env, net::IpAddr, str::FromStr};

use dotenvy::dotenv;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::errors::ConfigError;

// Server-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub workers: usize,
}

// Application-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: Environment,
    pub log_level: String,
}

// Environment enum for different deployment environments
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!(
                "Invalid environment: {}. Must be one of: development, testing, production",
                s
            )),
        }
    }
}

// Key-value store binding
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub redis_url: String,
}

/// CORS handling mode for the creation endpoint.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CorsMode {
    /// Wildcard allow-origin, no configuration needed
    Open,
    /// Exact-match allowlist; non-matching origins get no CORS headers
    List,
    /// No CORS headers at all
    Off,
}

impl FromStr for CorsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(CorsMode::Open),
            "list" => Ok(CorsMode::List),
            "off" => Ok(CorsMode::Off),
            _ => Err(format!(
                "Invalid CORS mode: {}. Must be one of: open, list, off",
                s
            )),
        }
    }
}

// Shortener behavior: code allocation, rate limiting, dedup, CORS
#[derive(Debug, Deserialize, Clone)]
pub struct ShortenerConfig {
    /// Base of issued short URLs; empty means derive from the request
    pub base_url: String,
    pub code_length: usize,
    /// Collision-retry bound for code allocation
    pub alloc_max_attempts: u32,
    pub rl_window_sec: i64,
    pub rl_max_req: i64,
    /// Dedup entry lifetime; <= 0 disables dedup entirely
    pub dedup_ttl_sec: i64,
    pub cors_mode: CorsMode,
    pub cors_origins: Vec<String>,
}

// Config struct that matches our environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub store: StoreConfig,
    pub shortener: ShortenerConfig,
}

type ConfigResult<T> = Result<T, ConfigError>;

impl Config {
    // Load configuration from environment variables
    pub fn load() -> ConfigResult<Self> {
        // Load .env file if it exists
        match dotenv() {
            Ok(_) => debug!(".env file loaded successfully"),
            Err(e) => debug!("Could not load .env file: {}", e),
        }

        let server = ServerConfig {
            host: get_env_or_default("SERVER_HOST", "127.0.0.1")?,
            port: get_env_or_default("SERVER_PORT", "8000")?,
            workers: get_env_or_default("SERVER_WORKERS", "4")?,
        };

        // Get version from Cargo.toml or environment
        let version = option_env!("CARGO_PKG_VERSION")
            .unwrap_or("0.1.0")
            .to_string();

        let app = AppConfig {
            name: get_env_or_default("APP_NAME", "kv-shortlink")?,
            version: env::var("APP_VERSION").unwrap_or(version),
            environment: get_env_or_default("APP_ENVIRONMENT", "development")?,
            log_level: get_env_or_default("RUST_LOG", "info")?,
        };

        let store = StoreConfig {
            redis_url: get_env_or_default("REDIS_URL", "redis://127.0.0.1:6379")?,
        };

        let mut rl_window_sec: i64 = get_env_or_default("RL_WINDOW_SEC", "60")?;
        if rl_window_sec < 10 {
            warn!(
                "RL_WINDOW_SEC {} below minimum, clamping to 10",
                rl_window_sec
            );
            rl_window_sec = 10;
        }
        let mut rl_max_req: i64 = get_env_or_default("RL_MAX_REQ", "10")?;
        if rl_max_req < 1 {
            warn!("RL_MAX_REQ {} below minimum, clamping to 1", rl_max_req);
            rl_max_req = 1;
        }

        let cors_origins: String = get_env_or_default("CORS_ORIGINS", "")?;
        let shortener = ShortenerConfig {
            base_url: get_env_or_default("BASE_URL", "")?,
            code_length: get_env_or_default("CODE_LENGTH", "7")?,
            alloc_max_attempts: get_env_or_default("ALLOC_MAX_ATTEMPTS", "6")?,
            rl_window_sec,
            rl_max_req,
            dedup_ttl_sec: get_env_or_default("DEDUP_TTL_SEC", "0")?,
            cors_mode: get_env_or_default("CORS_MODE", "open")?,
            cors_origins: parse_origin_list(&cors_origins),
        };

        let config = Config {
            server,
            app,
            store,
            shortener,
        };
        info!("Configuration loaded successfully");
        debug!("Loaded config: {:?}", config);

        Ok(config)
    }
}

/// Splits a comma-separated origin allowlist, dropping empty entries.
fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Helper function to get an env variable with a default value
fn get_env_or_default<T: FromStr>(key: &str, default: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(format!("Could not parse {}: {}", key, e))),
        Err(env::VarError::NotPresent) => {
            debug!("{} not set, using default: {}", key, default);
            default.parse::<T>().map_err(|e| {
                ConfigError::ParseError(format!("Could not parse default for {}: {}", key, e))
            })
        }
        Err(e) => Err(ConfigError::EnvVarError(e)),
    }
}
