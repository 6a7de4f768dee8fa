use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolve the data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. TABWEAVE_PATH environment variable (with tilde expansion)
/// 3. XDG data directory (recommended default)
/// 4. ~/.tabweave (fallback for systems without XDG)
pub fn resolve_data_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("TABWEAVE_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("tabweave"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".tabweave"));
    }

    Err(Error::Config(
        "Could not determine data path: no HOME directory or XDG data directory found".to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the JSON state document lives. Relative paths are resolved
    /// against the data directory.
    #[serde(default = "default_store_file")]
    pub store_file: PathBuf,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_idle_check_seconds")]
    pub idle_check_seconds: u64,
}

fn default_store_file() -> PathBuf {
    PathBuf::from("state.json")
}

fn default_debounce_ms() -> u64 {
    crate::runtime::DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_idle_check_seconds() -> u64 {
    crate::runtime::DEFAULT_IDLE_CHECK.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
            debounce_ms: default_debounce_ms(),
            idle_check_seconds: default_idle_check_seconds(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_data_path(None)?.join("config.toml"))
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        if self.store_file.is_absolute() {
            return Ok(self.store_file.clone());
        }
        Ok(resolve_data_path(None)?.join(&self.store_file))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn idle_check(&self) -> Duration {
        Duration::from_secs(self.idle_check_seconds.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.store_file, PathBuf::from("state.json"));
        assert_eq!(config.debounce(), Duration::from_secs(2));
        assert_eq!(config.idle_check(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let config = Config {
            store_file: PathBuf::from("/var/lib/tabweave/state.json"),
            debounce_ms: 500,
            idle_check_seconds: 30,
        };

        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.store_file, config.store_file);
        assert_eq!(loaded.debounce(), Duration::from_millis(500));
        assert_eq!(loaded.idle_check(), Duration::from_secs(30));

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.debounce_ms, default_debounce_ms());
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "debounce_ms = 100\n")?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.debounce(), Duration::from_millis(100));
        assert_eq!(loaded.store_file, PathBuf::from("state.json"));
        Ok(())
    }
}
