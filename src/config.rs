use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::sync::{CoordinatorConfig, SyncConfig};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Runtime configuration, built from defaults and environment overrides
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Directory holding the local snapshot files
    pub data_dir: PathBuf,
    pub bind_addr: String,
    /// Postgres connection for the remote document store; local-only when unset
    pub database_url: Option<String>,
    /// SQLite file for the backup store; in-memory backup when unset
    pub backup_db_path: Option<String>,
    pub sync: SyncConfig,
    pub coordinator: CoordinatorConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            backup_db_path: None,
            sync: SyncConfig::default(),
            coordinator: CoordinatorConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Defaults overridden by `PADEL_*` and `DATABASE_URL` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`TrackerConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("PADEL_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(addr) = lookup("PADEL_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "PADEL_SYNC_INTERVAL_SECS") {
            if secs == 0 {
                warn!("PADEL_SYNC_INTERVAL_SECS must be positive, keeping default");
            } else {
                config.sync.sync_interval = Duration::from_secs(secs);
            }
        }
        if let Some(millis) = parse_var::<u64, _>(&lookup, "PADEL_REMOTE_TIMEOUT_MS") {
            if millis == 0 {
                warn!("PADEL_REMOTE_TIMEOUT_MS must be positive, keeping default");
            } else {
                config.coordinator.remote_timeout = Duration::from_millis(millis);
            }
        }
        if let Some(passphrase) = lookup("PADEL_EDIT_PASSPHRASE") {
            config.coordinator.edit_passphrase = passphrase;
        }
        config.database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        config.backup_db_path = lookup("PADEL_BACKUP_DB").filter(|path| !path.is_empty());

        config
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = TrackerConfig::from_lookup(lookup_from(&[]));

        assert_eq!(config.sync.sync_interval, Duration::from_secs(30));
        assert_eq!(config.coordinator.remote_timeout, Duration::from_secs(5));
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.database_url.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = TrackerConfig::from_lookup(lookup_from(&[
            ("PADEL_SYNC_INTERVAL_SECS", "10"),
            ("PADEL_REMOTE_TIMEOUT_MS", "750"),
            ("PADEL_EDIT_PASSPHRASE", "club"),
            ("DATABASE_URL", "postgres://localhost/padel"),
        ]));

        assert_eq!(config.sync.sync_interval, Duration::from_secs(10));
        assert_eq!(config.coordinator.remote_timeout, Duration::from_millis(750));
        assert_eq!(config.coordinator.edit_passphrase, "club");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/padel")
        );
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = TrackerConfig::from_lookup(lookup_from(&[
            ("PADEL_SYNC_INTERVAL_SECS", "soon"),
            ("PADEL_REMOTE_TIMEOUT_MS", "-5"),
        ]));

        assert_eq!(config.sync.sync_interval, Duration::from_secs(30));
        assert_eq!(config.coordinator.remote_timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_durations_keep_defaults() {
        let config = TrackerConfig::from_lookup(lookup_from(&[
            ("PADEL_SYNC_INTERVAL_SECS", "0"),
            ("PADEL_REMOTE_TIMEOUT_MS", "0"),
        ]));

        assert_eq!(config.sync.sync_interval, Duration::from_secs(30));
        assert_eq!(config.coordinator.remote_timeout, Duration::from_secs(5));
    }
}
