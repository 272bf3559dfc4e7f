use crate::services::pokeapi_service::POKEAPI_BASE_URL;
use std::env;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CACHE_TTL_SECS: u64 = 300; // 5 minutes
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 600; // 10 minutes
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub pokeapi_base_url: String,
    /// Zero disables expiry of default-TTL entries.
    pub cache_default_ttl: Duration,
    pub cache_sweep_interval: Duration,
    pub upstream_timeout: Duration,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT);
        let pokeapi_base_url = lookup("POKEAPI_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| POKEAPI_BASE_URL.to_string());

        let cache_default_ttl = Duration::from_secs(parse_or(&lookup, "CACHE_DEFAULT_TTL_SECS", DEFAULT_CACHE_TTL_SECS));

        let sweep_secs = match parse_or(&lookup, "CACHE_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS) {
            0 => {
                log::warn!("⚠️  CACHE_SWEEP_INTERVAL_SECS must be positive, using {}", DEFAULT_SWEEP_INTERVAL_SECS);
                DEFAULT_SWEEP_INTERVAL_SECS
            }
            secs => secs,
        };

        let upstream_timeout = Duration::from_secs(parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT_SECS));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host,
            port,
            pokeapi_base_url,
            cache_default_ttl,
            cache_sweep_interval: Duration::from_secs(sweep_secs),
            upstream_timeout,
            cors_allowed_origins,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("⚠️  Invalid {}={:?}, using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}
