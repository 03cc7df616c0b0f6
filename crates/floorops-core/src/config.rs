use crate::error::ConfigError;
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "https://restaurent-server-vzsj.onrender.com";
pub const DATA_PATH: &str = "/data";
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 3;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 4;
pub const DEFAULT_CLOCK_TICK_SECS: u64 = 1;

pub const ENV_SERVER_URL: &str = "FLOOROPS_SERVER_URL";
pub const ENV_PROBE_INTERVAL: &str = "FLOOROPS_PROBE_INTERVAL_SECS";
pub const ENV_PROBE_TIMEOUT: &str = "FLOOROPS_PROBE_TIMEOUT_SECS";
pub const ENV_FETCH_TIMEOUT: &str = "FLOOROPS_FETCH_TIMEOUT_SECS";
pub const ENV_CLOCK_TICK: &str = "FLOOROPS_CLOCK_TICK_SECS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardConfig {
    pub base_url: String,
    pub probe_interval: Duration,
    pub probe_timeout: Duration,
    pub fetch_timeout: Duration,
    pub clock_tick: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            probe_interval: Duration::from_secs(DEFAULT_PROBE_INTERVAL_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            clock_tick: Duration::from_secs(DEFAULT_CLOCK_TICK_SECS),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves every field through `lookup`, falling back to the defaults
    /// for unset, blank or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup(ENV_SERVER_URL) {
            Some(value) if !value.trim().is_empty() => normalize_base_url(&value)?,
            _ => DEFAULT_SERVER_URL.to_string(),
        };
        Ok(Self {
            base_url,
            probe_interval: resolve_secs(&lookup, ENV_PROBE_INTERVAL, DEFAULT_PROBE_INTERVAL_SECS),
            probe_timeout: resolve_secs(&lookup, ENV_PROBE_TIMEOUT, DEFAULT_PROBE_TIMEOUT_SECS),
            fetch_timeout: resolve_secs(&lookup, ENV_FETCH_TIMEOUT, DEFAULT_FETCH_TIMEOUT_SECS),
            clock_tick: resolve_secs(&lookup, ENV_CLOCK_TICK, DEFAULT_CLOCK_TICK_SECS),
        })
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(self)
    }

    pub fn data_url(&self) -> String {
        format!("{}{DATA_PATH}", self.base_url)
    }
}

pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidUrl {
        value: raw.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

/// Whole seconds, rejecting zero so no loop can spin without a delay.
pub fn parse_secs(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}

fn resolve_secs<F>(lookup: &F, key: &str, default: u64) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    let secs = lookup(key)
        .as_deref()
        .and_then(parse_secs)
        .unwrap_or(default);
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_cadence() {
        let config = DashboardConfig::from_lookup(|_| None).expect("defaults");
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.probe_interval, Duration::from_secs(3));
        assert_eq!(config.probe_timeout, Duration::from_secs(3));
        assert_eq!(config.fetch_timeout, Duration::from_secs(4));
        assert_eq!(config.clock_tick, Duration::from_secs(1));
        assert_eq!(
            config.data_url(),
            "https://restaurent-server-vzsj.onrender.com/data"
        );
    }

    #[test]
    fn env_overrides_and_rejects_zero() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            (ENV_SERVER_URL, "http://127.0.0.1:8080/"),
            (ENV_PROBE_INTERVAL, "5"),
            (ENV_PROBE_TIMEOUT, "0"),
            (ENV_FETCH_TIMEOUT, "soon"),
            (ENV_CLOCK_TICK, " 2 "),
        ]))
        .expect("valid overrides");
        assert_eq!(config.data_url(), "http://127.0.0.1:8080/data");
        assert_eq!(config.probe_interval, Duration::from_secs(5));
        assert_eq!(config.probe_timeout, Duration::from_secs(3));
        assert_eq!(config.fetch_timeout, Duration::from_secs(4));
        assert_eq!(config.clock_tick, Duration::from_secs(2));
    }

    #[test]
    fn invalid_urls_are_errors() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(ConfigError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
        let blank = DashboardConfig::from_lookup(lookup_from(&[(ENV_SERVER_URL, "  ")]))
            .expect("blank falls back");
        assert_eq!(blank.base_url, DEFAULT_SERVER_URL);
    }
}
