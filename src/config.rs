//! Browser configuration module.
//!
//! Handles loading and validating `lightbox.toml`. Every option has a
//! default; user config files only specify the values they want to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # Directory the session opens on construction (no default)
//! initial_directory = "/home/me/Pictures"
//!
//! # Recognized image extensions, matched case-insensitively.
//! # A leading dot is accepted and ignored.
//! extensions = ["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"]
//!
//! # Name of the per-directory rotation cache file. Must be a bare file
//! # name: the file always lives inside the browsed directory.
//! rotation_cache_filename = "rotation_cache.txt"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Browser configuration loaded from `lightbox.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    /// Directory the session opens on construction, if it exists.
    pub initial_directory: Option<std::path::PathBuf>,
    /// Recognized image extensions, matched case-insensitively.
    pub extensions: Vec<String>,
    /// Name of the per-directory rotation cache file.
    pub rotation_cache_filename: String,
}

fn default_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Default name of the rotation cache file within a browsed directory.
pub const DEFAULT_ROTATION_CACHE_FILENAME: &str = "rotation_cache.txt";

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            initial_directory: None,
            extensions: default_extensions(),
            rotation_cache_filename: DEFAULT_ROTATION_CACHE_FILENAME.to_string(),
        }
    }
}

impl BrowserConfig {
    /// Whether a path's extension is one of the recognized image extensions.
    ///
    /// Matching is ASCII case-insensitive; configured entries may carry a
    /// leading dot (`".jpg"` and `"jpg"` are equivalent).
    pub fn recognizes(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    /// Validate invariants that serde defaults can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must list at least one entry".to_string(),
            ));
        }
        if self.rotation_cache_filename.is_empty() {
            return Err(ConfigError::Validation(
                "rotation_cache_filename must not be empty".to_string(),
            ));
        }
        if self.rotation_cache_filename.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "rotation_cache_filename must be a bare file name, got: {}",
                self.rotation_cache_filename
            )));
        }
        Ok(())
    }
}

/// Load configuration from a TOML file.
///
/// A missing file yields the defaults; a present file must parse and
/// validate.
pub fn load_config(path: &Path) -> Result<BrowserConfig, ConfigError> {
    if !path.exists() {
        return Ok(BrowserConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: BrowserConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = BrowserConfig::default();
        config.validate().unwrap();
        assert_eq!(config.rotation_cache_filename, "rotation_cache.txt");
        assert!(config.initial_directory.is_none());
        assert!(config.extensions.contains(&"jpg".to_string()));
    }

    #[test]
    fn recognizes_is_case_insensitive() {
        let config = BrowserConfig::default();
        assert!(config.recognizes(Path::new("photo.JPG")));
        assert!(config.recognizes(Path::new("photo.jpeg")));
        assert!(config.recognizes(Path::new("scan.TIFF")));
        assert!(!config.recognizes(Path::new("notes.txt")));
        assert!(!config.recognizes(Path::new("no_extension")));
    }

    #[test]
    fn recognizes_accepts_dotted_config_entries() {
        let config = BrowserConfig {
            extensions: vec![".jpg".to_string()],
            ..BrowserConfig::default()
        };
        assert!(config.recognizes(Path::new("photo.jpg")));
        assert!(!config.recognizes(Path::new("photo.png")));
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("lightbox.toml")).unwrap();
        assert_eq!(config.rotation_cache_filename, "rotation_cache.txt");
    }

    #[test]
    fn load_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lightbox.toml");
        std::fs::write(&path, r#"extensions = ["png"]"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.extensions, vec!["png".to_string()]);
        assert_eq!(config.rotation_cache_filename, "rotation_cache.txt");
    }

    #[test]
    fn load_reads_initial_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lightbox.toml");
        std::fs::write(&path, r#"initial_directory = "/photos""#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.initial_directory, Some(PathBuf::from("/photos")));
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lightbox.toml");
        std::fs::write(&path, r#"rotation_cache_file = "cache.txt""#).unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn validate_rejects_empty_extension_list() {
        let config = BrowserConfig {
            extensions: vec![],
            ..BrowserConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_cache_filename_with_separator() {
        let config = BrowserConfig {
            rotation_cache_filename: "sub/cache.txt".to_string(),
            ..BrowserConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }
}
