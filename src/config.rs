/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可, Auth token TTL, cache 接続先など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::middleware::auth::public_routes::DEFAULT_PUBLIC_PATTERNS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout_seconds: u64,

    // One TTL drives both the cache entry lifetime and the context expiry.
    pub auth_token_ttl_seconds: u64,
    pub auth_evict_expired: bool,
    pub auth_cache_prefix: String,
    // None selects the in-process cache
    pub valkey_url: Option<String>,

    pub public_path_patterns: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = split_list(lookup("CORS_ALLOWED_ORIGINS"));

        let request_timeout_seconds = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => 30,
        };

        let auth_token_ttl_seconds = match lookup("AUTH_TOKEN_TTL_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or(ConfigError::Invalid("AUTH_TOKEN_TTL_SECONDS"))?,
            None => 3600, // 1 hour
        };

        let auth_evict_expired = match lookup("AUTH_EVICT_EXPIRED") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("AUTH_EVICT_EXPIRED"))?,
            None => false,
        };

        let auth_cache_prefix = lookup("AUTH_CACHE_PREFIX")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "auth:context".to_string());

        let valkey_url = lookup("VALKEY_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let mut public_path_patterns = split_list(lookup("PUBLIC_PATH_PATTERNS"));
        if public_path_patterns.is_empty() {
            public_path_patterns = DEFAULT_PUBLIC_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect();
        }

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_timeout_seconds,
            auth_token_ttl_seconds,
            auth_evict_expired,
            auth_cache_prefix,
            valkey_url,
            public_path_patterns,
        })
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
