//! Configuration persistence for snapnote settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{AnnotationContext, DEFAULT_FONT_SIZE, DEFAULT_PIXEL_SIZE};

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapnoteConfig {
    /// Root of the screenshot record store (None = data dir)
    pub store_dir: Option<PathBuf>,
    /// Viewer identity; only the owner of a screenshot may annotate it
    pub user_id: String,
    /// Blur block size in pixels
    pub pixel_size: u32,
    /// Font size for text annotations
    pub font_size: f64,
    /// TrueType font used to draw text (None = probe system fonts)
    pub font_path: Option<PathBuf>,
}

impl Default for SnapnoteConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            user_id: String::new(),
            pixel_size: DEFAULT_PIXEL_SIZE,
            font_size: DEFAULT_FONT_SIZE,
            font_path: None,
        }
    }
}

impl SnapnoteConfig {
    /// Directory name under the platform config/data dirs
    pub const APP_DIR: &'static str = "snapnote";

    /// Path of the config file
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("No config directory on this platform")?;
        Ok(dir.join(Self::APP_DIR).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                log::warn!("Could not locate config file, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    /// Load from `path`; a missing file is not an error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let loaded = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))
            .and_then(|json| {
                serde_json::from_str::<Self>(&json)
                    .with_context(|| format!("Invalid config file: {}", path.display()))
            });
        match loaded {
            Ok(config) => config.normalized(),
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Root directory of the record store
    pub fn store_root(&self) -> Result<PathBuf> {
        match &self.store_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let dir = dirs::data_dir().context("No data directory on this platform")?;
                Ok(dir.join(Self::APP_DIR))
            }
        }
    }

    /// Annotation settings for an editor over `source`
    pub fn annotation_context(&self, source: std::rc::Rc<image::RgbaImage>) -> AnnotationContext {
        AnnotationContext::new(source)
            .with_pixel_size(self.pixel_size)
            .with_font_size(self.font_size)
    }

    fn normalized(mut self) -> Self {
        self.pixel_size = self.pixel_size.max(1);
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            self.font_size = DEFAULT_FONT_SIZE;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SnapnoteConfig::load_from(&dir.path().join("config.json"));
        assert_eq!(config, SnapnoteConfig::default());
        assert_eq!(config.pixel_size, 5);
        assert_eq!(config.font_size, 18.0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = SnapnoteConfig {
            user_id: "alice".into(),
            pixel_size: 8,
            store_dir: Some(dir.path().join("store")),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(SnapnoteConfig::load_from(&path), config);
        assert_eq!(config.store_root().unwrap(), dir.path().join("store"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"user_id": "bob", "pixel_size": 0}"#).unwrap();
        let config = SnapnoteConfig::load_from(&path);
        assert_eq!(config.user_id, "bob");
        assert_eq!(config.pixel_size, 1);
        assert_eq!(config.font_size, 18.0);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(SnapnoteConfig::load_from(&path), SnapnoteConfig::default());
    }
}
