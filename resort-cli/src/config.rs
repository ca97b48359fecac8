//! Pricing configuration loaded from a TOML file.
//!
//! Every key is optional; a missing file yields the defaults. Command-line
//! flags are applied on top with [`PricingConfig::apply_overrides`].
//!
//! ```toml
//! decas_rates = "data/conversion_decas.csv"
//! all_inclusive_rates = "data/todo_incluido.csv"
//! usd_per_deca = 5
//! decas_local_rate = 4000
//! default_currency_rate = 4000
//! default_discount_percent = 10
//! default_hotel = "Isleño"
//! log_level = "info"
//!
//! [child_policy]
//! free_below_age = 6
//! child_below_age = 12
//! child_factor = "0.75"
//! ```

use std::io;
use std::path::{Path, PathBuf};

use resort_core::DEFAULT_HOTEL;
use resort_core::PromotionSelection;
use resort_core::calculations::{AllInclusiveError, AllInclusivePolicy, DecasConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "resort-pricer.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: Decimal },

    #[error("default_discount_percent must be between 1 and 100, got {0}")]
    InvalidDiscountPercent(u32),

    #[error("invalid child_policy: {0}")]
    ChildPolicy(#[from] AllInclusiveError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    pub decas_rates: PathBuf,
    pub all_inclusive_rates: PathBuf,

    /// USD value of one deca.
    pub usd_per_deca: Decimal,
    /// Local currency per USD for Decas totals. Not user-adjustable per quote.
    pub decas_local_rate: Decimal,
    /// Starting local currency per USD for All-Inclusive quotes.
    pub default_currency_rate: Decimal,
    pub default_discount_percent: u32,
    pub default_hotel: String,

    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub log_level: String,

    pub child_policy: AllInclusivePolicy,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            decas_rates: PathBuf::from("data/conversion_decas.csv"),
            all_inclusive_rates: PathBuf::from("data/todo_incluido.csv"),
            usd_per_deca: Decimal::from(5),
            decas_local_rate: Decimal::from(4000),
            default_currency_rate: Decimal::from(4000),
            default_discount_percent: PromotionSelection::DEFAULT_PERCENT,
            default_hotel: DEFAULT_HOTEL.to_string(),
            log_level: "info".to_string(),
            child_policy: AllInclusivePolicy::default(),
        }
    }
}

impl PricingConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("usd_per_deca", self.usd_per_deca),
            ("decas_local_rate", self.decas_local_rate),
            ("default_currency_rate", self.default_currency_rate),
        ] {
            if value <= Decimal::ZERO {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(PromotionSelection::MIN_PERCENT..=PromotionSelection::MAX_PERCENT)
            .contains(&self.default_discount_percent)
        {
            return Err(ConfigError::InvalidDiscountPercent(
                self.default_discount_percent,
            ));
        }
        self.child_policy.validate()?;
        Ok(())
    }

    /// Applies command-line values over the file values.
    pub fn apply_overrides(
        &mut self,
        decas_rates: Option<PathBuf>,
        all_inclusive_rates: Option<PathBuf>,
        log_level: Option<String>,
    ) {
        if let Some(path) = decas_rates {
            self.decas_rates = path;
        }
        if let Some(path) = all_inclusive_rates {
            self.all_inclusive_rates = path;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
    }

    pub fn decas_config(&self) -> DecasConfig {
        DecasConfig {
            usd_per_deca: self.usd_per_deca,
            local_per_usd: self.decas_local_rate,
        }
    }
}
