use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::get_config_path;

/// Commented default config written by `ssi init`.
pub const DEFAULT_CONFIG: &str = "\
# ssi configuration

scoring:
  # How marketTiming is adjusted before weighting:
  #   piecewise     - best near the middle of the scale, penalized at both ends
  #   pass_through  - raw value, higher is always better
  market_timing: piecewise

# Where saved startups are stored
# store_path: ~/.config/ssi/startups.json
";

/// Write the default config file.
///
/// Uses `path` when given, otherwise the default config path. Refuses to
/// replace an existing file unless `force` is set. Returns the written path.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let path = path.unwrap_or_else(get_config_path);

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    ensure_parent(&path)?;

    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(DEFAULT_CONFIG.as_bytes())
        .context("Failed to write config")?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(path)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory at {}", parent.display())
        })?;
    }
    Ok(())
}
