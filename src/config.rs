//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::cache::TtlDefaults;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_cache_size: usize,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// HTTP admin server port
    pub server_port: u16,
    /// Default lifetimes per data class
    pub ttl: TtlDefaults,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_CACHE_SIZE` - Maximum cache entries (default: 100)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `TTL_OVERVIEW_SECS` - Dashboard overview TTL (default: 300)
    /// - `TTL_REALTIME_SECS` - Realtime TTL (default: 30)
    /// - `TTL_ENTITY_METRICS_SECS` - Per-entity metrics TTL (default: 600)
    /// - `TTL_REPORTS_SECS` - Reports TTL (default: 1800)
    ///
    /// Unparseable values and zero sizes/intervals fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_cache_size: env_positive("MAX_CACHE_SIZE").unwrap_or(defaults.max_cache_size),
            cleanup_interval: env_positive("CLEANUP_INTERVAL")
                .unwrap_or(defaults.cleanup_interval),
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
            ttl: TtlDefaults {
                overview: env_secs("TTL_OVERVIEW_SECS").unwrap_or(defaults.ttl.overview),
                realtime: env_secs("TTL_REALTIME_SECS").unwrap_or(defaults.ttl.realtime),
                entity_metrics: env_secs("TTL_ENTITY_METRICS_SECS")
                    .unwrap_or(defaults.ttl.entity_metrics),
                reports: env_secs("TTL_REPORTS_SECS").unwrap_or(defaults.ttl.reports),
            },
        }
    }

    /// Returns a copy with zero `max_cache_size` or `cleanup_interval`
    /// replaced by the defaults, matching what `from_env` accepts.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut config = self.clone();

        if config.max_cache_size == 0 {
            warn!(
                "max_cache_size of 0 is not usable, falling back to {}",
                defaults.max_cache_size
            );
            config.max_cache_size = defaults.max_cache_size;
        }
        if config.cleanup_interval == 0 {
            warn!(
                "cleanup_interval of 0 is not usable, falling back to {}s",
                defaults.cleanup_interval
            );
            config.cleanup_interval = defaults.cleanup_interval;
        }
        config
    }

    /// Sweep period as a Duration.
    pub fn cleanup_period(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cache_size: 100,
            cleanup_interval: 300,
            server_port: 3000,
            ttl: TtlDefaults::default(),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_positive<T: FromStr + PartialOrd + Default>(name: &str) -> Option<T> {
    env_parse(name).filter(|v: &T| *v > T::default())
}

fn env_secs(name: &str) -> Option<Duration> {
    env_parse(name).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_cache_size, 100);
        assert_eq!(config.cleanup_interval, 300);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_period(), Duration::from_secs(300));
        assert_eq!(config.ttl, TtlDefaults::default());
    }

    #[test]
    fn test_sanitized_replaces_zeroes() {
        let config = Config {
            max_cache_size: 0,
            cleanup_interval: 0,
            server_port: 8080,
            ttl: TtlDefaults::default(),
        }
        .sanitized();

        assert_eq!(config.max_cache_size, 100);
        assert_eq!(config.cleanup_interval, 300);
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let config = Config {
            max_cache_size: 7,
            cleanup_interval: 5,
            ..Config::default()
        };
        let sanitized = config.sanitized();

        assert_eq!(sanitized.max_cache_size, 7);
        assert_eq!(sanitized.cleanup_interval, 5);
    }

    // Touches process env; kept as one test so variables are not raced.
    #[test]
    fn test_config_from_env() {
        env::remove_var("MAX_CACHE_SIZE");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("SERVER_PORT");
        env::remove_var("TTL_OVERVIEW_SECS");
        env::remove_var("TTL_REALTIME_SECS");
        env::remove_var("TTL_ENTITY_METRICS_SECS");
        env::remove_var("TTL_REPORTS_SECS");

        let config = Config::from_env();
        assert_eq!(config.max_cache_size, 100);
        assert_eq!(config.cleanup_interval, 300);
        assert_eq!(config.server_port, 3000);

        env::set_var("MAX_CACHE_SIZE", "0");
        env::set_var("CLEANUP_INTERVAL", "not-a-number");
        env::set_var("TTL_REALTIME_SECS", "15");

        let config = Config::from_env();
        assert_eq!(config.max_cache_size, 100);
        assert_eq!(config.cleanup_interval, 300);
        assert_eq!(config.ttl.realtime, Duration::from_secs(15));

        env::remove_var("MAX_CACHE_SIZE");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("TTL_REALTIME_SECS");
    }
}
