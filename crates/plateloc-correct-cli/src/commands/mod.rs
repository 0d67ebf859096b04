pub mod correct;
pub mod factors;
pub mod init_config;

use std::path::Path;

use anyhow::{Context, Result};
use plateloc_correct::Config;

/// Load the config file if one was given, otherwise defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}
