//! User configuration and scenario files
//!
//! Configuration lives in `<config dir>/propcalc/config.toml` and only
//! changes defaults: the starting sale scenario, the gain brackets and the
//! template for new properties. Every section is optional.
//!
//! ```toml
//! [sale]
//! sale_price = 320000
//! outstanding_mortgage = 45000
//!
//! [sale.fees]
//! agency_fee_pct = 3
//!
//! [tax]
//! brackets = ["6000:19", "44000:21", "inf:23"]
//!
//! [property]
//! rent_per_room = 450
//! ```

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PropcalcError, Result};
use crate::investment::PropertyInput;
use crate::sale::SaleInput;
use crate::tax::{default_gain_brackets, TaxBracket};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sale: SaleInput,
    pub tax: TaxConfig,
    pub property: PropertyInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaxConfig {
    /// Gain brackets in `WIDTH:RATE_PCT` form. Empty means the built-in table.
    pub brackets: Vec<TaxBracket>,
}

impl Config {
    /// Platform config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dir_spec::config_home().map(|dir| dir.join("propcalc").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and built-in defaults are used when no file is there.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, PropcalcError> {
        toml::from_str(contents).map_err(|e| PropcalcError::Config(e.to_string()))
    }

    /// Brackets used for the income tax on the sale gain
    pub fn sale_brackets(&self) -> Vec<TaxBracket> {
        if self.tax.brackets.is_empty() {
            default_gain_brackets()
        } else {
            self.tax.brackets.clone()
        }
    }
}

/// Input for a one-shot portfolio evaluation
///
/// ```toml
/// capital = 192670
///
/// [[property]]
/// purchase_price = 150000
/// num_rooms = 3
/// ```
///
/// Fields a property leaves out take the built-in property defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Available capital; when absent the configured sale's net proceeds are used
    pub capital: Option<Decimal>,
    #[serde(rename = "property")]
    pub properties: Vec<PropertyInput>,
}

impl Scenario {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = toml::from_str(&contents)
            .map_err(|e| PropcalcError::Config(e.to_string()))
            .with_context(|| format!("invalid scenario file {}", path.display()))?;
        Ok(scenario)
    }
}
