use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    currency::{CurrencyCode, LocaleConfig},
    errors::LedgerError,
    ledger::LedgerPolicy,
    utils::{
        paths::{app_data_dir, config_file_in},
        persistence::{ensure_dir, load_json, save_json_atomic},
    },
};

const MAX_DUPLICATE_WINDOW_SECS: i64 = 86_400;

/// User preferences persisted next to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Label shown wherever the current user appears.
    pub current_user_name: String,
    pub duplicate_window_secs: i64,
    pub match_tolerance: f64,
    pub balance_epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        let policy = LedgerPolicy::default();
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            current_user_name: "You".into(),
            duplicate_window_secs: policy.duplicate_window.num_seconds(),
            match_tolerance: policy.match_tolerance,
            balance_epsilon: policy.balance_epsilon,
        }
    }
}

impl Config {
    pub fn policy(&self) -> LedgerPolicy {
        LedgerPolicy {
            duplicate_window: Duration::seconds(self.duplicate_window_secs),
            match_tolerance: self.match_tolerance,
            balance_epsilon: self.balance_epsilon,
        }
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(&self.currency)
    }

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::from_tag(&self.locale)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if !(0..=MAX_DUPLICATE_WINDOW_SECS).contains(&self.duplicate_window_secs) {
            return Err(LedgerError::Config(format!(
                "duplicate_window_secs must be between 0 and {MAX_DUPLICATE_WINDOW_SECS}"
            )));
        }
        if !(self.match_tolerance >= 0.0 && self.balance_epsilon >= 0.0) {
            return Err(LedgerError::Config(
                "match_tolerance and balance_epsilon must be non-negative".into(),
            ));
        }
        let code = self.currency.trim();
        if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(LedgerError::Config(format!(
                "`{}` is not a three-letter currency code",
                self.currency
            )));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Loads the stored config, falling back to defaults when none was saved.
    pub fn load(&self) -> Result<Config, LedgerError> {
        let config: Config = load_json(&self.path)?.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        config.validate()?;
        save_json_atomic(config, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.policy(), LedgerPolicy::default());
    }

    #[test]
    fn saved_values_are_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            currency: "EUR".into(),
            locale: "de-DE".into(),
            duplicate_window_secs: 10,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.currency_code().as_str(), "EUR");
        assert_eq!(loaded.locale_config().decimal_separator, ',');
        assert_eq!(loaded.policy().duplicate_window, Duration::seconds(10));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        std::fs::write(manager.path(), r#"{ "currency": "GBP" }"#).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.currency, "GBP");
        assert_eq!(loaded.current_user_name, "You");
    }

    #[test]
    fn invalid_currency_is_rejected() {
        let config = Config {
            currency: "dollars".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(LedgerError::Config(_))));
    }
}
