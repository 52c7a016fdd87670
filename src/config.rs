//! Configuration management with validation and defaults
//!
//! TOML file, then `MINICASINO_*` environment overrides, then validation.

use crate::economy::DEFAULT_LEVEL_THRESHOLDS;
use crate::errors::{CasinoResult, ConfigurationError};
use crate::games::types::GameKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CasinoConfig {
    pub economy: EconomyConfig,
    pub presentation: PresentationConfig,
    pub preferences: PreferencesConfig,
}

/// Balance, bet limits and the level table
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_balance: u64,
    pub minimum_bet: u64,
    pub level_thresholds: Vec<u64>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_balance: 10_000,
            minimum_bet: 100,
            level_thresholds: DEFAULT_LEVEL_THRESHOLDS.to_vec(),
        }
    }
}

/// Delay between a round resolving and its result being shown.
/// Settlement never waits on these.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub wheel_reveal_ms: u64,
    pub roulette_reveal_ms: u64,
    pub dice_reveal_ms: u64,
    pub mines_reveal_ms: u64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            wheel_reveal_ms: 6_000,
            roulette_reveal_ms: 4_000,
            dice_reveal_ms: 0,
            mines_reveal_ms: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./minicasino_preferences.json"),
        }
    }
}

impl PresentationConfig {
    pub fn reveal_delay(&self, game: GameKind) -> Duration {
        let ms = match game {
            GameKind::WheelOfFortune => self.wheel_reveal_ms,
            GameKind::Roulette => self.roulette_reveal_ms,
            GameKind::Dice => self.dice_reveal_ms,
            GameKind::Mines => self.mines_reveal_ms,
        };
        Duration::from_millis(ms)
    }
}

impl CasinoConfig {
    /// No presentation delays, for tests and simulations.
    pub fn testing() -> Self {
        Self {
            presentation: PresentationConfig {
                wheel_reveal_ms: 0,
                roulette_reveal_ms: 0,
                dice_reveal_ms: 0,
                mines_reveal_ms: 0,
            },
            ..Default::default()
        }
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.economy.minimum_bet == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "economy.minimum_bet".to_string(),
                value: "0".to_string(),
                reason: "Minimum bet must be > 0".to_string(),
            });
        }

        if self.economy.level_thresholds.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                field: "economy.level_thresholds".to_string(),
                value: "[]".to_string(),
                reason: "At least one level threshold is required".to_string(),
            });
        }

        if let Some(zero) = self.economy.level_thresholds.iter().position(|t| *t == 0) {
            return Err(ConfigurationError::InvalidValue {
                field: format!("economy.level_thresholds[{}]", zero),
                value: "0".to_string(),
                reason: "Level thresholds must be > 0".to_string(),
            });
        }

        if self.preferences.path.as_os_str().is_empty() {
            return Err(ConfigurationError::InvalidValue {
                field: "preferences.path".to_string(),
                value: String::new(),
                reason: "Preference path cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration loader with environment variable support
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> CasinoResult<CasinoConfig> {
        let mut config = match &self.config_path {
            Some(path) => Self::load_from_file(path)?,
            None => CasinoConfig::default(),
        };

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<CasinoConfig, ConfigurationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)))
    }

    fn apply_env_overrides(config: &mut CasinoConfig) -> Result<(), ConfigurationError> {
        if let Ok(balance) = env::var("MINICASINO_STARTING_BALANCE") {
            config.economy.starting_balance =
                balance.parse().map_err(|_| ConfigurationError::InvalidValue {
                    field: "MINICASINO_STARTING_BALANCE".to_string(),
                    value: balance,
                    reason: "Invalid point amount".to_string(),
                })?;
        }

        if let Ok(minimum) = env::var("MINICASINO_MIN_BET") {
            config.economy.minimum_bet =
                minimum.parse().map_err(|_| ConfigurationError::InvalidValue {
                    field: "MINICASINO_MIN_BET".to_string(),
                    value: minimum,
                    reason: "Invalid point amount".to_string(),
                })?;
        }

        if let Ok(path) = env::var("MINICASINO_PREFERENCES_PATH") {
            config.preferences.path = PathBuf::from(path);
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, config: &CasinoConfig, path: P) -> CasinoResult<()> {
        let path = path.as_ref();
        let toml_string = toml::to_string_pretty(config).map_err(|e| {
            ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, toml_string).map_err(|e| {
            ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path.display(), e))
                .into()
        })
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config<P: AsRef<Path>>(path: P) -> CasinoResult<()> {
    ConfigLoader::new().save(&CasinoConfig::default(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = CasinoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.economy.starting_balance, 10_000);
        assert_eq!(config.economy.minimum_bet, 100);
        assert_eq!(config.economy.level_thresholds, vec![2, 4, 8, 16, 32]);
    }

    #[test]
    fn test_testing_config_has_no_delays() {
        let config = CasinoConfig::testing();
        assert!(config.validate().is_ok());
        for game in GameKind::ALL {
            assert_eq!(config.presentation.reveal_delay(game), Duration::ZERO);
        }
    }

    #[test]
    fn test_reveal_delays() {
        let config = CasinoConfig::default();
        assert_eq!(
            config.presentation.reveal_delay(GameKind::WheelOfFortune),
            Duration::from_millis(6_000)
        );
        assert_eq!(
            config.presentation.reveal_delay(GameKind::Roulette),
            Duration::from_millis(4_000)
        );
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = CasinoConfig::default();
        config.economy.minimum_bet = 0;
        assert!(config.validate().is_err());

        let mut config = CasinoConfig::default();
        config.economy.level_thresholds = vec![];
        assert!(config.validate().is_err());

        let mut config = CasinoConfig::default();
        config.economy.level_thresholds = vec![2, 0, 8];
        match config.validate() {
            Err(ConfigurationError::InvalidValue { field, .. }) => {
                assert_eq!(field, "economy.level_thresholds[1]")
            }
            other => panic!("Expected invalid threshold, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CasinoConfig = toml::from_str(
            r#"
            [economy]
            starting_balance = 500
            "#,
        )
        .expect("parse");
        assert_eq!(config.economy.starting_balance, 500);
        assert_eq!(config.economy.minimum_bet, 100);
        assert_eq!(config.presentation.wheel_reveal_ms, 6_000);
    }

    #[test]
    fn test_save_and_load_config() -> CasinoResult<()> {
        let temp_file = NamedTempFile::new().expect("temp file");
        let path = temp_file.path();

        let mut original = CasinoConfig::default();
        original.economy.starting_balance = 2_500;
        ConfigLoader::new().save(&original, path)?;

        let loaded = ConfigLoader::new().with_path(path).load_file_only()?;
        assert_eq!(loaded.economy.starting_balance, 2_500);
        assert_eq!(loaded.economy.level_thresholds, original.economy.level_thresholds);

        Ok(())
    }

    impl ConfigLoader {
        // Environment-free variant so parallel tests cannot interfere.
        fn load_file_only(&self) -> CasinoResult<CasinoConfig> {
            let path = self.config_path.as_ref().expect("path set");
            let config = Self::load_from_file(path)?;
            config.validate()?;
            Ok(config)
        }
    }

    #[test]
    fn test_missing_file_fails_to_load() {
        let result = ConfigLoader::new()
            .with_path("/nonexistent/minicasino.toml")
            .load();
        assert!(result.is_err());
    }
}
