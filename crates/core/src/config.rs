//! Application configuration.
//!
//! Settings live in `<config_dir>/railtui/config.toml`. Every setting
//! has a default, so a missing file is not an error;
//! [`ensure_default_config`] writes a commented template on first run.
//! Domain data is never configured here beyond an optional seed file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};

/// Directory name under the platform config dir.
pub const CONFIG_DIR: &str = "railtui";
/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_TICK_RATE_MS: u64 = 250;

/// Settings for the terminal application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional JSON seed file replacing the built-in timetable.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Directory receiving the log file; `./logs` when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// UI tick interval in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate_ms() -> u64 {
    DEFAULT_TICK_RATE_MS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            log_dir: None,
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

impl AppConfig {
    /// Absolute path of the config file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join(CONFIG_FILE)
    }

    /// Load configuration from the default location, falling back to
    /// defaults when the file is absent.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let parsed = settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(parsed)
    }
}

/// Write a default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    ensure_default_config_at(AppConfig::config_path())
}

fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let template = format!(
        "# railtui configuration\n\
         #\n\
         # catalog_path = \"/path/to/catalog.json\"\n\
         # log_dir = \"/path/to/logs\"\n\
         tick_rate_ms = {DEFAULT_TICK_RATE_MS}\n"
    );
    fs::write(path, template).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert!(config.catalog_path.is_none());
        assert_eq!(config.tick_rate_ms, DEFAULT_TICK_RATE_MS);
        Ok(())
    }

    #[test]
    fn file_overrides_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "catalog_path = \"/tmp/custom.json\"\ntick_rate_ms = 100\n",
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/custom.json")));
        assert_eq!(config.tick_rate_ms, 100);
        assert!(config.log_dir.is_none());
        Ok(())
    }

    #[test]
    fn template_written_once_and_parseable() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("railtui").join("config.toml");

        ensure_default_config_at(&path)?;
        assert!(path.exists());

        // A second call must not clobber user edits.
        fs::write(&path, "tick_rate_ms = 42\n")?;
        ensure_default_config_at(&path)?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.tick_rate_ms, 42);
        Ok(())
    }
}
