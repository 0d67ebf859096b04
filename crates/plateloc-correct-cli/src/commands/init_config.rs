//! Config file initialization command.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use plateloc_correct::Config;

pub fn run(output: PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }

    Config::default()
        .save(&output)
        .with_context(|| format!("Failed to write config to {}", output.display()))?;

    println!("Wrote default config to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plateloc.json");

        run(path.clone(), false).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        assert!(run(path.clone(), false).is_err());
        assert!(run(path, true).is_ok());
    }
}
