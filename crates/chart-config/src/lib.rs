#![deny(warnings)]

//! File-backed chart configuration and rosters.
//!
//! Layout under the asset root:
//! - `chart.yaml`: [`ChartConfig`] overrides; missing keys keep their defaults
//! - `rosters/<name>.yaml` or `rosters/<name>.json`: a [`Roster`]

use chart_core::{self as core, ChartConfig, Roster};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error in {path}: {msg}")]
    Parse { path: String, msg: String },
    #[error("invalid data: {0}")]
    Invalid(#[from] core::ValidationError),
    #[error("roster not found: {0}")]
    RosterNotFound(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

fn parse_error(path: &Path, msg: impl ToString) -> ConfigError {
    ConfigError::Parse {
        path: path.display().to_string(),
        msg: msg.to_string(),
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Read and validate a chart config from a YAML or JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ChartConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let cfg: ChartConfig = if is_json(path) {
        serde_json::from_str(&text).map_err(|e| parse_error(path, e))?
    } else {
        serde_yaml::from_str(&text).map_err(|e| parse_error(path, e))?
    };
    core::validate_config(&cfg)?;
    Ok(cfg)
}

/// Read and validate a roster from a YAML or JSON file.
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Roster, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let roster: Roster = if is_json(path) {
        serde_json::from_str(&text).map_err(|e| parse_error(path, e))?
    } else {
        serde_yaml::from_str(&text).map_err(|e| parse_error(path, e))?
    };
    core::validate_roster(&roster)?;
    info!(
        path = %path.display(),
        songs = roster.songs.len(),
        albums = roster.albums.len(),
        artists = roster.artists.len(),
        "roster loaded"
    );
    Ok(roster)
}

/// Asset directory holding the chart config and named rosters.
pub struct ConfigStore {
    root: PathBuf,
    config: ChartConfig,
    config_mtime: Option<SystemTime>,
}

impl ConfigStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config: ChartConfig::default(),
            config_mtime: None,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("chart.yaml")
    }

    /// Current config; defaults until [`ConfigStore::load`] finds a file.
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Load `chart.yaml`, keeping defaults when it does not exist.
    pub fn load(&mut self) -> Result<(), ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            info!(root = %self.root.display(), "no chart.yaml, using defaults");
            self.config = ChartConfig::default();
            self.config_mtime = None;
            return Ok(());
        }
        self.config = load_config(&path)?;
        self.config_mtime = Some(modified(&path)?);
        info!(path = %path.display(), "chart config loaded");
        Ok(())
    }

    /// Reload `chart.yaml` if it changed on disk. Returns whether it did.
    pub fn reload_if_changed(&mut self) -> Result<bool, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(false);
        }
        let mtime = modified(&path)?;
        if self.config_mtime.is_some_and(|seen| mtime <= seen) {
            return Ok(false);
        }
        info!("Reloading chart config: {}", path.display());
        self.config = load_config(&path)?;
        self.config_mtime = Some(mtime);
        Ok(true)
    }

    /// Names of rosters available under `rosters/`, sorted.
    pub fn rosters(&self) -> Result<Vec<String>, ConfigError> {
        let dir = self.root.join("rosters");
        if !dir.is_dir() {
            return Ok(vec![]);
        }
        let mut names = Vec::new();
        for ent in fs::read_dir(dir)? {
            let path = ent?.path();
            let supported = path
                .extension()
                .is_some_and(|e| e == "yaml" || e == "yml" || e == "json");
            if !supported {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Load a roster by name from `rosters/`.
    pub fn roster(&self, name: &str) -> Result<Roster, ConfigError> {
        let dir = self.root.join("rosters");
        for ext in ["yaml", "yml", "json"] {
            let path = dir.join(format!("{name}.{ext}"));
            if path.exists() {
                return load_roster(path);
            }
        }
        Err(ConfigError::RosterNotFound(name.to_string()))
    }
}

fn modified(path: &Path) -> Result<SystemTime, ConfigError> {
    Ok(fs::metadata(path)?
        .modified()
        .unwrap_or(SystemTime::UNIX_EPOCH))
}
