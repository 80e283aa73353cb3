//! Application-level configuration loading, including leaderboard bucketing rules.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "LEADERBOARD_BACK_CONFIG_PATH";

const DEFAULT_RETENTION_DAYS: u32 = 7;
const DEFAULT_BUCKET_TOP_COUNT: usize = 1000;
const DEFAULT_OUTCOME_QUEUE_CAPACITY: usize = 1024;

/// Size of the time buckets that receive every accepted high score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketGranularity {
    /// One leaderboard per UTC calendar day.
    #[default]
    Daily,
    /// One leaderboard per ISO week.
    Weekly,
}

/// Rules driving the derived leaderboard views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardConfig {
    /// Granularity of the bucketed view written on every accepted score.
    pub granularity: BucketGranularity,
    /// Number of days, today included, that bucket queries may look back.
    pub retention_days: u32,
    /// Entry count returned by the current-bucket shortcut.
    pub bucket_top_count: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            granularity: BucketGranularity::Daily,
            retention_days: DEFAULT_RETENTION_DAYS,
            bucket_top_count: DEFAULT_BUCKET_TOP_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Leaderboard bucketing rules.
    pub leaderboard: LeaderboardConfig,
    /// Capacity of the outcome log queue before records start being dropped.
    pub outcome_queue_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            leaderboard: LeaderboardConfig::default(),
            outcome_queue_capacity: DEFAULT_OUTCOME_QUEUE_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        granularity = ?app_config.leaderboard.granularity,
                        retention_days = app_config.leaderboard.retention_days,
                        "loaded leaderboard config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON configuration document. Missing keys keep their defaults.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    leaderboard: RawLeaderboard,
    outcome_queue_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLeaderboard {
    #[serde(default)]
    granularity: BucketGranularity,
    retention_days: Option<u32>,
    bucket_top_count: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let leaderboard = LeaderboardConfig {
            granularity: value.leaderboard.granularity,
            // A zero-day window would reject every bucket query, including today's.
            retention_days: value
                .leaderboard
                .retention_days
                .unwrap_or(DEFAULT_RETENTION_DAYS)
                .max(1),
            bucket_top_count: value
                .leaderboard
                .bucket_top_count
                .unwrap_or(DEFAULT_BUCKET_TOP_COUNT),
        };
        Self {
            leaderboard,
            outcome_queue_capacity: value
                .outcome_queue_capacity
                .unwrap_or(DEFAULT_OUTCOME_QUEUE_CAPACITY)
                .max(1),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(AppConfig::parse("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn weekly_granularity_and_window_are_read() {
        let config = AppConfig::parse(
            r#"{"leaderboard":{"granularity":"weekly","retention_days":3,"bucket_top_count":50}}"#,
        )
        .unwrap();
        assert_eq!(config.leaderboard.granularity, BucketGranularity::Weekly);
        assert_eq!(config.leaderboard.retention_days, 3);
        assert_eq!(config.leaderboard.bucket_top_count, 50);
        assert_eq!(config.outcome_queue_capacity, DEFAULT_OUTCOME_QUEUE_CAPACITY);
    }

    #[test]
    fn zero_sized_settings_are_clamped() {
        let config =
            AppConfig::parse(r#"{"leaderboard":{"retention_days":0},"outcome_queue_capacity":0}"#)
                .unwrap();
        assert_eq!(config.leaderboard.retention_days, 1);
        assert_eq!(config.outcome_queue_capacity, 1);
    }

    #[test]
    fn unknown_granularity_is_rejected() {
        assert!(AppConfig::parse(r#"{"leaderboard":{"granularity":"hourly"}}"#).is_err());
    }
}
