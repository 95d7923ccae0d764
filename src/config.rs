//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-organizer\config.toml
//! - macOS: ~/Library/Application Support/music-organizer/config.toml
//! - Linux: ~/.config/music-organizer/config.toml
//!
//! The file is optional and human-editable. Only the binary reads it; the
//! migration core receives plain values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::metadata::{DEFAULT_EXTENSIONS, SupportedFormats};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where migrated files are written
    pub output: OutputConfig,

    /// Which files are considered music
    pub formats: FormatConfig,

    /// Progress reporting during a run
    pub progress: ProgressConfig,
}

/// Output location settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output root (empty = the user's documents folder)
    pub root: Option<PathBuf>,
}

/// Supported input formats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// File extensions to migrate, matched case-insensitively
    pub extensions: Vec<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Progress settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Milliseconds between progress updates
    pub interval_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

impl Config {
    /// Configured output root, or the platform documents folder, or home.
    pub fn output_root(&self) -> Option<PathBuf> {
        self.output
            .root
            .clone()
            .or_else(dirs::document_dir)
            .or_else(dirs::home_dir)
    }

    pub fn supported_formats(&self) -> SupportedFormats {
        SupportedFormats::new(&self.formats.extensions)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress.interval_ms.max(1))
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-organizer"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from `path`, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        Self::config(e.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[formats]"));
        assert!(toml.contains("[progress]"));
        assert!(toml.contains("interval_ms = 100"));
    }

    #[test]
    fn test_default_formats() {
        let formats = Config::default().supported_formats();
        assert!(formats.contains("mp3"));
        assert!(formats.contains("m4a"));
        assert!(formats.contains("m4p"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[output]
root = "/srv/music"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.output_root(), Some(PathBuf::from("/srv/music")));
        assert_eq!(config.formats, FormatConfig::default());
        assert_eq!(config.progress_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_custom_extensions() {
        let toml = r#"
[formats]
extensions = ["FLAC", "ogg"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let formats = config.supported_formats();
        assert!(formats.contains("flac"));
        assert!(formats.contains("OGG"));
        assert!(!formats.contains("mp3"));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut config = Config::default();
        config.progress.interval_ms = 0;
        assert_eq!(config.progress_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.output.root = Some(PathBuf::from("/music/out"));
        config.progress.interval_ms = 250;

        save_to(&config, &path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(load_from(&path), config);
    }

    #[test]
    fn test_load_missing_or_broken_file_gives_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(load_from(&dir.path().join("absent.toml")), Config::default());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "this is [not toml").unwrap();
        assert_eq!(load_from(&broken), Config::default());
    }
}
