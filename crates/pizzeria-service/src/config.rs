//! # Pizzeria Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     PIZZERIA_NAME="Pizzaria Dona Rosa"                                  │
//! │     PIZZERIA_AUTO_CONFIRM_MS=2000                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/orders/pizzeria.toml (Linux)                              │
//! │     ~/Library/Application Support/com.pizzeria.orders/pizzeria.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [restaurant]
//! name = "Pizzaria Dona Rosa"
//! currency_symbol = "R$"
//!
//! [kitchen]
//! auto_confirm_delay_ms = 2000
//! submission_delay_ms = 1000
//! recent_orders_limit = 5
//! ```

use pizzeria_core::Money;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};

// =============================================================================
// Restaurant Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSettings {
    #[serde(default = "default_restaurant_name")]
    pub name: String,

    /// Prefix used when printing amounts.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_restaurant_name() -> String {
    "Pizzaria Dona Rosa".to_string()
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

impl Default for RestaurantSettings {
    fn default() -> Self {
        RestaurantSettings {
            name: default_restaurant_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Kitchen Settings
// =============================================================================

/// Timing of the order flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenSettings {
    /// Delay before a pending order is confirmed automatically.
    #[serde(default = "default_auto_confirm_delay")]
    pub auto_confirm_delay_ms: u64,

    /// Simulated processing latency of a submission.
    #[serde(default = "default_submission_delay")]
    pub submission_delay_ms: u64,

    /// How many orders the "recent orders" panel shows.
    #[serde(default = "default_recent_orders_limit")]
    pub recent_orders_limit: usize,
}

fn default_auto_confirm_delay() -> u64 {
    2000
}
fn default_submission_delay() -> u64 {
    1000
}
fn default_recent_orders_limit() -> usize {
    5
}

impl Default for KitchenSettings {
    fn default() -> Self {
        KitchenSettings {
            auto_confirm_delay_ms: default_auto_confirm_delay(),
            submission_delay_ms: default_submission_delay(),
            recent_orders_limit: default_recent_orders_limit(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PizzeriaConfig {
    #[serde(default)]
    pub restaurant: RestaurantSettings,

    #[serde(default)]
    pub kitchen: KitchenSettings,
}

impl PizzeriaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (pizzeria.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ServiceResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pizzeria config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Reads a config file. A missing file yields the defaults.
    fn from_file(path: &Path) -> ServiceResult<Self> {
        if !path.exists() {
            debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        info!(?path, "Loading pizzeria config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ServiceResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ServiceError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ServiceError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ServiceError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Pizzeria config saved");
        Ok(())
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if self.restaurant.currency_symbol.trim().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "currency_symbol must not be empty".into(),
            ));
        }

        if self.kitchen.recent_orders_limit == 0 {
            return Err(ServiceError::InvalidConfig(
                "recent_orders_limit must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from a key lookup; `load` passes the process
    /// environment. Unparseable numbers are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("PIZZERIA_NAME") {
            debug!(name = %name, "Overriding restaurant name from environment");
            self.restaurant.name = name;
        }

        if let Some(symbol) = lookup("PIZZERIA_CURRENCY") {
            self.restaurant.currency_symbol = symbol;
        }

        if let Some(ms) = lookup("PIZZERIA_AUTO_CONFIRM_MS") {
            match ms.parse::<u64>() {
                Ok(v) => self.kitchen.auto_confirm_delay_ms = v,
                Err(_) => warn!(value = %ms, "Invalid PIZZERIA_AUTO_CONFIRM_MS in environment"),
            }
        }

        if let Some(ms) = lookup("PIZZERIA_SUBMISSION_DELAY_MS") {
            match ms.parse::<u64>() {
                Ok(v) => self.kitchen.submission_delay_ms = v,
                Err(_) => warn!(value = %ms, "Invalid PIZZERIA_SUBMISSION_DELAY_MS in environment"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "pizzeria", "orders")
            .map(|dirs| dirs.config_dir().join("pizzeria.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn auto_confirm_delay(&self) -> Duration {
        Duration::from_millis(self.kitchen.auto_confirm_delay_ms)
    }

    pub fn submission_delay(&self) -> Duration {
        Duration::from_millis(self.kitchen.submission_delay_ms)
    }

    /// `R$ 55.00`
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{} {}", self.restaurant.currency_symbol, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pizzeria-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let config = PizzeriaConfig::default();
        assert_eq!(config.restaurant.currency_symbol, "R$");
        assert_eq!(config.auto_confirm_delay(), Duration::from_millis(2000));
        assert_eq!(config.submission_delay(), Duration::from_millis(1000));
        assert_eq!(config.kitchen.recent_orders_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = PizzeriaConfig::default();
        config.restaurant.currency_symbol = " ".into();
        assert!(config.validate().unwrap_err().is_config_error());

        let mut config = PizzeriaConfig::default();
        config.kitchen.recent_orders_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PIZZERIA_NAME", "Forno Velho"),
            ("PIZZERIA_AUTO_CONFIRM_MS", "50"),
            ("PIZZERIA_SUBMISSION_DELAY_MS", "soon"),
        ]
        .into_iter()
        .collect();

        let mut config = PizzeriaConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.restaurant.name, "Forno Velho");
        assert_eq!(config.kitchen.auto_confirm_delay_ms, 50);
        assert_eq!(config.kitchen.submission_delay_ms, 1000);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "[kitchen]\nauto_confirm_delay_ms = 10\n").unwrap();

        let config = PizzeriaConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.kitchen.auto_confirm_delay_ms, 10);
        assert_eq!(config.kitchen.submission_delay_ms, 1000);
        assert_eq!(config.restaurant, RestaurantSettings::default());
    }

    #[test]
    fn test_save_then_read() {
        let path = temp_path("saved");
        let mut config = PizzeriaConfig::default();
        config.restaurant.name = "Forno Velho".into();

        config.save(Some(path.clone())).unwrap();
        let loaded = PizzeriaConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = PizzeriaConfig::from_file(&temp_path("missing")).unwrap();
        assert_eq!(config, PizzeriaConfig::default());
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_path("malformed");
        std::fs::write(&path, "[kitchen\n").unwrap();

        let err = PizzeriaConfig::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_format_currency() {
        let config = PizzeriaConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(5500)), "R$ 55.00");
    }
}
