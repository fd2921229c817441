/// User configuration
///
/// Stored as JSON. The default location is:
/// - Linux: ~/.config/plot-gallery/config.json
/// - macOS: ~/Library/Application Support/plot-gallery/config.json
/// - Windows: %APPDATA%\plot-gallery\config.json
///
/// A missing file means defaults; every field may be left out.
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Quiet period before a typed query is applied, 0 applies every keystroke
    pub debounce_ms: u64,
    /// Longest side of grid thumbnails in pixels
    pub thumbnail_size: u32,
    /// Directory names the HTML export never descends into
    pub skip_dirs: Vec<String>,
    /// One-line description shown next to a directory in the navigation
    pub description_file: String,
    /// Page template replacing the built-in one for HTML export
    pub template: Option<PathBuf>,
    pub theme: ThemeChoice,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: 0,
            thumbnail_size: 256,
            skip_dirs: vec![
                "root-files".to_string(),
                "pdf-files".to_string(),
                "C-files".to_string(),
            ],
            description_file: "shortdescription.txt".to_string(),
            template: None,
            theme: ThemeChoice::Dark,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|source| GalleryError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| GalleryError::Config { path: path.clone(), source })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("plot-gallery");
        path.push("config.json");
        Some(path)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Interval the query input coalesces keystrokes over, if any
    pub fn debounce(&self) -> Option<Duration> {
        (self.debounce_ms > 0).then(|| Duration::from_millis(self.debounce_ms))
    }
}
