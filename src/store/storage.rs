use super::types::{StartupStore, STORE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the default store file path (~/.config/ssi/startups.json)
pub fn get_store_path() -> PathBuf {
    crate::config::get_config_dir().join("startups.json")
}

/// Load the startup store from a JSON file
///
/// If the file doesn't exist, returns a new empty store.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_store(path: &Path) -> Result<StartupStore> {
    if !path.exists() {
        debug!(path = %path.display(), "no store file, starting empty");
        return Ok(StartupStore::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open startup store at {}", path.display()))?;

    let store: StartupStore =
        serde_json::from_reader(file).context("Failed to load startup store")?;

    if store.version != STORE_VERSION {
        anyhow::bail!("Unsupported startup store version: {}", store.version);
    }

    debug!(path = %path.display(), count = store.startups.len(), "loaded startup store");
    Ok(store)
}

/// Save the startup store to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_store(path: &Path, store: &StartupStore) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, store).context("Failed to serialize startup store")?;

    file.commit().context("Failed to save startup store")?;

    debug!(path = %path.display(), count = store.startups.len(), "saved startup store");
    Ok(())
}
