use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use splitledger_core::Participants;

use crate::store::CsvStore;

/// Tracker settings, read from TOML. Every key is optional.
///
/// ```toml
/// even_epsilon_cents = 1
/// recent_window_days = 90
/// top_merchants = 5
/// trend_months = 6
///
/// [participants]
/// first = "Katy"
/// second = "Sebastien"
///
/// [store]
/// path = "expenses.csv"
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Balances closer to even than this many cents count as even.
    pub even_epsilon_cents: u32,

    /// Length of the recent-transactions window.
    pub recent_window_days: u32,

    /// How many merchants the top lists show.
    pub top_merchants: usize,

    /// How many months the spending trend covers.
    pub trend_months: usize,

    pub participants: Participants,

    pub store: StoreConfig,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// CSV file holding the transaction rows. A relative path read by
    /// [`TrackerConfig::from_file`] is taken relative to the configuration file.
    pub path: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            even_epsilon_cents: 1,
            recent_window_days: 90,
            top_merchants: 5,
            trend_months: 6,
            participants: Participants::default(),
            store: StoreConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        if let (Some(store), Some(dir)) = (config.store.path.as_mut(), path.parent()) {
            if store.is_relative() {
                *store = dir.join(&*store);
            }
        }
        Ok(config)
    }

    /// Parse configuration from a TOML string. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or the settings fail [`TrackerConfig::validate`].
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks that the participants are two distinct, non-empty names and that the recent window
    /// is at least one day long.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Participants { first, second } = &self.participants;
        if first.trim().is_empty() || second.trim().is_empty() {
            return Err(ConfigError::Validation(
                "participant names must not be empty".to_string(),
            ));
        }
        if first == second {
            return Err(ConfigError::Validation(format!(
                "participants must be two different people, both are named {:?}",
                first
            )));
        }
        if self.recent_window_days == 0 {
            return Err(ConfigError::Validation(
                "recent_window_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn even_epsilon(&self) -> Decimal {
        Decimal::new(i64::from(self.even_epsilon_cents), 2)
    }

    /// The CSV store named by `store.path`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if no path is configured.
    pub fn csv_store(&self) -> Result<CsvStore, ConfigError> {
        self.store
            .path
            .as_ref()
            .map(CsvStore::new)
            .ok_or_else(|| ConfigError::Validation("store.path is not set".to_string()))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(TrackerConfig::from_toml("").unwrap(), TrackerConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = TrackerConfig::from_toml(indoc!(
            r#"
            recent_window_days = 30

            [participants]
            first = "Ana"
            second = "Bo"

            [store]
            path = "bills.csv"
            "#
        ))
        .unwrap();
        assert_eq!(config.recent_window_days, 30);
        assert_eq!(config.participants, Participants::new("Ana", "Bo"));
        assert_eq!(config.store.path, Some(PathBuf::from("bills.csv")));
        assert_eq!(config.top_merchants, 5);
        assert_eq!(config.even_epsilon(), Decimal::new(1, 2));
    }

    #[test]
    fn csv_store_needs_a_path() {
        assert!(matches!(
            TrackerConfig::default().csv_store(),
            Err(ConfigError::Validation(_))
        ));

        let config = TrackerConfig::from_toml("[store]\npath = \"bills.csv\"").unwrap();
        assert_eq!(config.csv_store().unwrap().path(), Path::new("bills.csv"));
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = TrackerConfig::default();
        config.trend_months = 12;
        let text = config.to_toml().unwrap();
        assert_eq!(TrackerConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn rejects_bad_participants() {
        let same = indoc!(
            r#"
            [participants]
            first = "Katy"
            second = "Katy"
            "#
        );
        assert!(matches!(
            TrackerConfig::from_toml(same),
            Err(ConfigError::Validation(_))
        ));

        let blank = indoc!(
            r#"
            [participants]
            first = " "
            second = "Katy"
            "#
        );
        assert!(matches!(
            TrackerConfig::from_toml(blank),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_empty_window_and_bad_toml() {
        assert!(matches!(
            TrackerConfig::from_toml("recent_window_days = 0"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            TrackerConfig::from_toml("top_merchants = \"five\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
