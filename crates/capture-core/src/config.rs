//! Configuration for the capture analysis pass.
//!
//! Exactly three settings are recognized — `declaration`, `function` and
//! `reference` — each `"always"` (default) or `"never"`, toggling one report
//! stream independently. Any other key is rejected. Settings load from a
//! `capture.toml` file found by walking up from a start directory, or from
//! any serde source the host prefers.

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "capture.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportToggle {
    #[default]
    Always,
    Never,
}

impl ReportToggle {
    pub fn is_enabled(&self) -> bool {
        matches!(self, ReportToggle::Always)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    pub declaration: ReportToggle,
    pub function: ReportToggle,
    pub reference: ReportToggle,
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_config(path: &Path) -> Result<CaptureConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

pub fn load_config_or_default(start_dir: &Path) -> CaptureConfig {
    find_config_file(start_dir)
        .and_then(|path| load_config(&path).ok())
        .unwrap_or_default()
}
