//! Discovery thresholds and their YAML representation.
//!
//! The defaults are the heuristic constants the enum discovery was tuned
//! with. A YAML file may override any subset of them:
//!
//! ```yaml
//! max_enum_values: 20
//! null_tokens: ["NA", "n/a"]
//! ```

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_ENUM_VALUES: u64 = 2;
pub const MAX_ENUM_VALUES: u64 = 15;
pub const NUMERIC_RATIO_THRESHOLD: f64 = 0.5;
pub const LONG_TEXT_THRESHOLD: usize = 50;
pub const LONG_TEXT_RATIO_THRESHOLD: f64 = 0.3;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("min_enum_values ({min}) must not exceed max_enum_values ({max})")]
    InvertedBounds { min: u64, max: u64 },
    #[error("{name} must lie within [0, 1] (got {value})")]
    RatioOutOfRange { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Paths need at least this many distinct values to be considered at all.
    pub min_enum_values: u64,
    /// Paths with more observed values are oversized unless their siblings outvote them.
    pub max_enum_values: u64,
    pub numeric_ratio_threshold: f64,
    /// Values longer than this many characters count as long text.
    pub long_text_threshold: usize,
    pub long_text_ratio_threshold: f64,
    /// Literal sample values treated the same as an empty cell.
    pub null_tokens: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            min_enum_values: MIN_ENUM_VALUES,
            max_enum_values: MAX_ENUM_VALUES,
            numeric_ratio_threshold: NUMERIC_RATIO_THRESHOLD,
            long_text_threshold: LONG_TEXT_THRESHOLD,
            long_text_ratio_threshold: LONG_TEXT_RATIO_THRESHOLD,
            null_tokens: Vec::new(),
        }
    }
}

impl DiscoveryConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: DiscoveryConfig = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the built-in thresholds.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_enum_values > self.max_enum_values {
            return Err(ConfigError::InvertedBounds {
                min: self.min_enum_values,
                max: self.max_enum_values,
            });
        }
        for (name, value) in [
            ("numeric_ratio_threshold", self.numeric_ratio_threshold),
            ("long_text_ratio_threshold", self.long_text_ratio_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RatioOutOfRange { name, value });
            }
        }
        Ok(())
    }

    pub fn is_null_token(&self, value: &str) -> bool {
        self.null_tokens.iter().any(|token| token == value)
    }
}
