use kis_core::{KisError, Locale};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::continuous::MAX_PAGES;

/// Settings for a continuous query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuousQueryConfig {
    /// Hard cap on pages fetched per call. Reaching it is not an error.
    pub max_pages: usize,
    /// Selects the `100`/`200` continuation parameter names.
    pub locale: Locale,
}

impl Default for ContinuousQueryConfig {
    fn default() -> Self {
        Self {
            max_pages: MAX_PAGES,
            locale: Locale::Domestic,
        }
    }
}

impl ContinuousQueryConfig {
    pub fn for_locale(locale: Locale) -> Self {
        Self {
            locale,
            ..Default::default()
        }
    }

    /// Parse a flat TOML document (`max_pages`, `locale`); missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, KisError> {
        let config: Self = toml::from_str(s)
            .map_err(|e| KisError::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, KisError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), KisError> {
        if self.max_pages == 0 {
            return Err(KisError::Config("max_pages must be at least 1".to_string()));
        }
        Ok(())
    }
}
