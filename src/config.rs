/// Service configuration.
///
/// Loaded from a TOML file at startup; every field has a default so a
/// missing file or partial file still yields a runnable configuration.
/// Database credentials come from the environment (dotenv), not from here.

use serde::Deserialize;
use std::path::Path;

/// Top-level configuration for the polling daemon and prediction pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the external ML prediction server.
    pub model_server_url: String,
    /// Connect budget for the model service call, in seconds.
    pub model_connect_timeout_secs: u64,
    /// Total budget for the model service call, in seconds.
    pub model_request_timeout_secs: u64,
    /// Horizon used when the request omits one or supplies an out-of-range
    /// value.
    pub default_horizon_hours: u32,
    /// How many recent readings the fallback estimator looks at.
    pub history_window: usize,
    /// Minimum wall-clock gap between forwarded submissions, in seconds.
    /// This is a blanket rate limit: it applies even when the values differ
    /// from the last accepted submission.
    pub min_submit_interval_secs: i64,
    /// Cadence of the ingestion-triggered prediction refresh, in seconds.
    pub poll_interval_secs: u64,
    /// Cadence of the aggregate-chart refresh, in seconds.
    pub aggregate_interval_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_server_url: "http://localhost:5000".to_string(),
            model_connect_timeout_secs: 2,
            model_request_timeout_secs: 5,
            default_horizon_hours: 6,
            history_window: 10,
            min_submit_interval_secs: 30,
            poll_interval_secs: 10,
            aggregate_interval_secs: 30,
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from a TOML file, falling back to defaults when
    /// the file does not exist. A file that exists but fails to parse is an
    /// error — silently ignoring a broken config hides misdeployments.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        toml::from_str(&raw).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }
}

// ---------------------------------------------------------------------------
// Horizon resolution
// ---------------------------------------------------------------------------

/// Lowest accepted forecast horizon, in hours.
pub const HORIZON_MIN: i64 = 1;
/// Highest accepted forecast horizon, in hours.
pub const HORIZON_MAX: i64 = 48;
/// Default for `default_horizon_hours` when not configured.
pub const HORIZON_DEFAULT: u32 = 6;

/// Resolves a requested horizon to a usable one.
///
/// Absent input and input outside [1, 48] both resolve to `default` (the
/// operator-configured `default_horizon_hours`) — the value is substituted,
/// not clamped to the nearest bound. Bad input is never an error.
pub fn resolve_horizon(requested: Option<i64>, default: u32) -> u32 {
    match requested {
        Some(h) if (HORIZON_MIN..=HORIZON_MAX).contains(&h) => h as u32,
        _ => default,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_horizon_passes_in_range_values() {
        assert_eq!(resolve_horizon(Some(1), HORIZON_DEFAULT), 1);
        assert_eq!(resolve_horizon(Some(24), HORIZON_DEFAULT), 24);
        assert_eq!(resolve_horizon(Some(48), HORIZON_DEFAULT), 48);
    }

    #[test]
    fn test_resolve_horizon_substitutes_default_for_out_of_range() {
        assert_eq!(resolve_horizon(Some(0), HORIZON_DEFAULT), HORIZON_DEFAULT);
        assert_eq!(resolve_horizon(Some(49), HORIZON_DEFAULT), HORIZON_DEFAULT);
        assert_eq!(resolve_horizon(Some(-5), HORIZON_DEFAULT), HORIZON_DEFAULT);
        assert_eq!(resolve_horizon(Some(i64::MAX), HORIZON_DEFAULT), HORIZON_DEFAULT);
    }

    #[test]
    fn test_resolve_horizon_substitutes_default_for_absent() {
        assert_eq!(resolve_horizon(None, HORIZON_DEFAULT), HORIZON_DEFAULT);
    }

    #[test]
    fn test_resolve_horizon_honors_configured_default() {
        // An operator-set default_horizon_hours must be the substituted
        // value, not the built-in constant.
        let config: ServiceConfig =
            toml::from_str("default_horizon_hours = 12").expect("valid partial config");
        assert_eq!(config.default_horizon_hours, 12);
        assert_eq!(resolve_horizon(None, config.default_horizon_hours), 12);
        assert_eq!(resolve_horizon(Some(0), config.default_horizon_hours), 12);
        assert_eq!(resolve_horizon(Some(24), config.default_horizon_hours), 24);
    }

    #[test]
    fn test_resolve_horizon_is_idempotent() {
        // Resolving an already-resolved horizon must not change it.
        for input in [None, Some(0), Some(6), Some(48), Some(100)] {
            let once = resolve_horizon(input, HORIZON_DEFAULT);
            assert_eq!(resolve_horizon(Some(once as i64), HORIZON_DEFAULT), once);
        }
    }

    #[test]
    fn test_default_config_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.model_connect_timeout_secs, 2);
        assert_eq!(config.model_request_timeout_secs, 5);
        assert_eq!(config.default_horizon_hours, 6);
        assert_eq!(config.history_window, 10);
        assert_eq!(config.min_submit_interval_secs, 30);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = ServiceConfig::load(Path::new("/nonexistent/aquamon.toml"))
            .expect("missing file should fall back to defaults");
        assert_eq!(config.poll_interval_secs, 10);
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let parsed: ServiceConfig =
            toml::from_str("min_submit_interval_secs = 60").expect("valid partial config");
        assert_eq!(parsed.min_submit_interval_secs, 60);
        assert_eq!(parsed.default_horizon_hours, 6);
    }
}
