//! Quote configuration
//!
//! Caller-chosen tolerances applied on top of exact engine outputs.
//! Loaded from TOML with `CPMM_`-prefixed environment overrides.

use crate::error::AmmError;
use anyhow::{Context, Result};
use config_crate::{Config, Environment, File, FileFormat};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Tolerances used when turning exact quotes into transaction bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Fraction in (0, 1) by which amounts may move against the caller
    pub slippage_tolerance: Decimal,
    /// Reject swaps whose price impact exceeds this percentage
    pub max_price_impact_pct: Option<Decimal>,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            slippage_tolerance: dec!(0.005), // 0.5%
            max_price_impact_pct: None,
        }
    }
}

impl QuoteConfig {
    /// Create a config with the given slippage and no impact limit
    pub fn with_slippage(slippage_tolerance: Decimal) -> Result<Self, AmmError> {
        let config = Self {
            slippage_tolerance,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, then apply `CPMM_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading quote config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("CPMM")
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build quote configuration")?
            .try_deserialize()
            .context("Failed to deserialize quote configuration")?;

        config.validate().context("Invalid quote configuration")?;
        debug!(?config, "Quote config loaded");
        Ok(config)
    }

    /// Parse from an in-memory TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .context("Failed to parse quote configuration")?
            .try_deserialize()
            .context("Failed to deserialize quote configuration")?;

        config.validate().context("Invalid quote configuration")?;
        Ok(config)
    }

    /// Check that all tolerances are in range
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.slippage_tolerance <= dec!(0) || self.slippage_tolerance >= dec!(1) {
            return Err(AmmError::InvalidSlippage(self.slippage_tolerance));
        }
        Ok(())
    }
}
