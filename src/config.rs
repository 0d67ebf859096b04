//! On-disk configuration.
//!
//! A config file is a JSON document; every field is optional:
//!
//! ```json
//! {
//!   "geometry": { "setup_distance": 13.0, "actual_distance": 25.0 },
//!   "reader": "naive",
//!   "strict": false
//! }
//! ```
//!
//! Missing geometry fields fall back to the reference defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::ReaderMode;
use crate::geometry::GeometryParams;

/// Persistent defaults for a correction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Geometry used when no flag overrides a field.
    pub geometry: GeometryParams,
    /// How CSV lines are split.
    pub reader: ReaderMode,
    /// Reject degenerate geometry instead of emitting non-finite values.
    pub strict: bool,
}

impl Config {
    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Save the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Check the geometry when strict mode is on.
    pub fn check(&self) -> Result<()> {
        if self.strict {
            self.geometry.validate()?;
        }
        Ok(())
    }
}
