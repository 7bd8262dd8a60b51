//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the file dialogs start in
    pub last_directory: Option<PathBuf>,
    /// Window settings
    pub window: WindowConfig,
    /// Editor pane settings
    pub editor: EditorConfig,
    /// Preview pane settings
    pub preview: PreviewConfig,
}

/// Initial window geometry in logical pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

/// Editor-specific settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Font size in points
    pub font_size: f32,
    /// Share of the window width given to the editor pane
    pub split_ratio: f32,
}

/// Preview settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Body font size in points; headings scale from it
    pub font_size: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 500.0,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            split_ratio: 0.5,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { font_size: 14.0 }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "mdpad", "mdpad").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, using defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    /// Save configuration to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Remember `directory` for the next dialog. Returns whether it changed.
    pub fn remember_directory(&mut self, directory: Option<&Path>) -> bool {
        match directory {
            Some(dir) if self.last_directory.as_deref() != Some(dir) => {
                self.last_directory = Some(dir.to_path_buf());
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_size() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 600.0);
        assert_eq!(config.window.height, 500.0);
        assert!(config.last_directory.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.editor.font_size = 16.0;
        config.last_directory = Some(PathBuf::from("/notes"));
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "editor": { "split_ratio": 0.4 } }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.editor.split_ratio, 0.4);
        assert_eq!(config.editor.font_size, 14.0);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_remember_directory() {
        let mut config = AppConfig::default();
        assert!(config.remember_directory(Some(Path::new("/notes"))));
        assert!(!config.remember_directory(Some(Path::new("/notes"))));
        assert!(!config.remember_directory(None));
        assert_eq!(config.last_directory, Some(PathBuf::from("/notes")));
    }
}
