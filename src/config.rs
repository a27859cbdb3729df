// Runtime configuration

use crate::backend::{Backend, MemoryBackend};
use crate::file::FileBackend;
use crate::sqlite::SqliteBackend;
use crate::store::DEFAULT_KEY;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const APP_DIR: &str = "todostore";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    #[default]
    File,
    Sqlite,
}

/// Store settings, loaded from YAML and overridable from the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendKind,
    /// Data directory; defaults to the platform data dir
    pub path: Option<PathBuf>,
    pub key: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: None,
            key: DEFAULT_KEY.to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config {:?}", path))?;
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config {:?}", path))
    }

    /// Load an explicit file, else the default file if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_config_path() {
            Some(default) if default.exists() => Self::load(default),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.yaml"))
    }

    /// Directory the file and SQLite backends write into
    pub fn data_dir(&self) -> Result<PathBuf> {
        self.path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
            .ok_or_else(|| eyre!("Could not determine data directory; set `path`"))
    }

    /// Construct the configured backend
    pub fn open_backend(&self) -> Result<Box<dyn Backend>> {
        let backend: Box<dyn Backend> = match self.backend {
            BackendKind::Memory => Box::new(MemoryBackend::new()),
            BackendKind::File => Box::new(FileBackend::open(self.data_dir()?)?),
            BackendKind::Sqlite => Box::new(SqliteBackend::open(self.data_dir()?.join("todostore.db"))?),
        };
        info!(backend = ?self.backend, key = %self.key, "Opened backend");
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend, BackendKind::File);
        assert_eq!(config.key, "vibes-todos");
        assert_eq!(config.log_level, "warn");
        assert!(config.path.is_none());
    }

    #[test]
    fn test_load_partial_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        fs::write(&config_path, "backend: sqlite\nkey: work-todos\n").unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.backend, BackendKind::Sqlite);
        assert_eq!(config.key, "work-todos");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        fs::write(&config_path, "backend: [not, a, kind]\n").unwrap();

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_load_or_default_explicit_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load_or_default(Some(&temp.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn test_open_backends() {
        let temp = TempDir::new().unwrap();

        for kind in [BackendKind::Memory, BackendKind::File, BackendKind::Sqlite] {
            let config = Config {
                backend: kind,
                path: Some(temp.path().to_path_buf()),
                ..Config::default()
            };
            let mut backend = config.open_backend().unwrap();
            backend.write("probe", "ok").unwrap();
            assert_eq!(backend.read("probe").unwrap().as_deref(), Some("ok"));
        }

        assert!(temp.path().join("todostore.db").exists());
        assert!(temp.path().join("probe.json").exists());
    }
}
