//! Configuration Module
//!
//! Handles loading and validating configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_MAX_ENTRIES;
use crate::error::{CacheError, Result};
use crate::limiter::GEOCODE_REQUESTS_PER_SECOND;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable lines
    Text,
}

impl FromStr for LogFormat {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "pretty" => Ok(LogFormat::Text),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown log format '{}', expected 'json' or 'text'",
                other
            ))),
        }
    }
}

/// Process configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Minimum spacing between calls to the rate-limited upstream, in milliseconds
    pub min_interval_ms: u64,
    /// Observability HTTP port
    pub server_port: u16,
    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `MIN_INTERVAL_MS` - Rate limiter spacing in milliseconds (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `LOG_FORMAT` - `json` or `text` (default: json)
    ///
    /// Unset variables take their default. A variable that is set but does not parse,
    /// or parses to an unusable value, is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            max_entries: parse_var(&lookup, "MAX_ENTRIES")?.unwrap_or(defaults.max_entries),
            sweep_interval: parse_var(&lookup, "SWEEP_INTERVAL")?
                .unwrap_or(defaults.sweep_interval),
            min_interval_ms: parse_var(&lookup, "MIN_INTERVAL_MS")?
                .unwrap_or(defaults.min_interval_ms),
            server_port: parse_var(&lookup, "SERVER_PORT")?.unwrap_or(defaults.server_port),
            log_format: parse_var(&lookup, "LOG_FORMAT")?.unwrap_or(defaults.log_format),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects zero capacity, interval or port.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "MAX_ENTRIES must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "SWEEP_INTERVAL must be greater than zero".to_string(),
            ));
        }
        if self.min_interval_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "MIN_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        if self.server_port == 0 {
            return Err(CacheError::InvalidConfig(
                "SERVER_PORT must be between 1 and 65535".to_string(),
            ));
        }
        Ok(())
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            sweep_interval: 60,
            min_interval_ms: (1000.0 / GEOCODE_REQUESTS_PER_SECOND) as u64,
            server_port: 8000,
            log_format: LogFormat::default(),
        }
    }
}

/// `Ok(None)` when unset; an error naming the variable when set but unparseable.
fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };

    raw.trim().parse().map(Some).map_err(|_| {
        CacheError::InvalidConfig(format!("{} has an invalid value '{}'", name, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limiter::RateLimiter;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.sweep_interval, 60);
        assert_eq!(config.min_interval(), Duration::from_secs(1));
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_interval_matches_geocode_ceiling() {
        let limiter = RateLimiter::per_second(GEOCODE_REQUESTS_PER_SECOND).unwrap();
        assert_eq!(Config::default().min_interval(), limiter.min_interval());
    }

    #[test]
    fn test_config_unset_vars_use_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.min_interval_ms, 1000);
    }

    #[test]
    fn test_config_reads_set_vars() {
        let config = Config::from_lookup(lookup_from(&[
            ("MAX_ENTRIES", " 500 "),
            ("MIN_INTERVAL_MS", "250"),
            ("LOG_FORMAT", "text"),
        ]))
        .unwrap();

        assert_eq!(config.max_entries, 500);
        assert_eq!(config.min_interval(), Duration::from_millis(250));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_config_negative_values_fail_fast() {
        let err = Config::from_lookup(lookup_from(&[("MAX_ENTRIES", "-5")])).unwrap_err();
        assert!(matches!(&err, CacheError::InvalidConfig(msg) if msg.contains("MAX_ENTRIES")));

        let err = Config::from_lookup(lookup_from(&[("MIN_INTERVAL_MS", "-1")])).unwrap_err();
        assert!(matches!(&err, CacheError::InvalidConfig(msg) if msg.contains("MIN_INTERVAL_MS")));
    }

    #[test]
    fn test_config_garbage_and_zero_fail_fast() {
        assert!(Config::from_lookup(lookup_from(&[("SERVER_PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("MAX_ENTRIES", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SWEEP_INTERVAL", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])).is_err());
    }

    #[test]
    fn test_config_validate_rejects_zero() {
        let zero_entries = Config {
            max_entries: 0,
            ..Config::default()
        };
        assert!(matches!(
            zero_entries.validate(),
            Err(CacheError::InvalidConfig(_))
        ));

        let zero_interval = Config {
            min_interval_ms: 0,
            ..Config::default()
        };
        assert!(zero_interval.validate().is_err());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Text);
    }
}
