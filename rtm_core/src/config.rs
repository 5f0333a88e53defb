//! Compliance band configuration.
//!
//! The acceptable range of average daily visits per route depends on the
//! commercial-figure type. The lookup ships with a compiled-in default band
//! and can be overridden from a TOML file:
//!
//! ```toml
//! [default]
//! min = 48
//! max = 58
//!
//! [per_type.EDI]
//! min = 0
//! max = 99
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Inclusive `[min, max]` range of average daily visits for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub min: i64,
    pub max: i64,
}

impl Band {
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Band applied when a commercial-figure type has no entry of its own.
pub const DEFAULT_BAND: Band = Band { min: 48, max: 58 };

/// Per-commercial-figure band lookup with a default fallback. The fallback
/// makes classification total: every route resolves to some band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub default: Band,
    pub per_type: BTreeMap<String, Band>,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_BAND,
            per_type: BTreeMap::new(),
        }
    }
}

impl BandConfig {
    /// Band for `commercial_figure`, falling back to the default band.
    pub fn band_for(&self, commercial_figure: &str) -> Band {
        self.per_type
            .get(commercial_figure)
            .copied()
            .unwrap_or(self.default)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: BandConfig =
            toml::from_str(raw).map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<()> {
        for (label, band) in std::iter::once(("default", &self.default))
            .chain(self.per_type.iter().map(|(k, v)| (k.as_str(), v)))
        {
            if band.min > band.max {
                return Err(DashboardError::Config(format!(
                    "band '{}' has min {} > max {}",
                    label, band.min, band.max
                )));
            }
        }
        Ok(())
    }
}
