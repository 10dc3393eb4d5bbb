//! Panel settings stored as TOML
//!
//! Every section falls back to defaults when missing, so a partial (or empty)
//! file is always valid. Environment variables and CLI flags are layered on
//! top after loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{api_defaults, config, printer, service};

/// Top-level panel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub printer: PrinterSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub defaults: PrintDefaults,
    #[serde(default)]
    pub window: WindowSettings,
}

/// Refine service connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Where the print service expects its files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterSettings {
    /// Drive prefix such as `D:`
    #[serde(default = "default_drive")]
    pub drive: String,
    /// Destination directory used when the host cannot report one
    #[serde(default = "default_fallback_dir")]
    pub fallback_dir: String,
}

/// Filesystem locations; unset entries resolve under the platform data dir
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Bundled images copied into `images_dir` at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_dir: Option<PathBuf>,
}

/// Initial geometry of the Test Print form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintDefaults {
    #[serde(default = "default_width")]
    pub width: String,
    #[serde(default = "default_height")]
    pub height: String,
    #[serde(default = "default_left")]
    pub left: String,
    #[serde(default = "default_top")]
    pub top: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "default_window_width")]
    pub width: f32,
    #[serde(default = "default_window_height")]
    pub height: f32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_endpoint() -> String {
    service::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_ms() -> u64 {
    service::DEFAULT_TIMEOUT_MS
}

fn default_drive() -> String {
    printer::DEFAULT_DRIVE.to_string()
}

fn default_fallback_dir() -> String {
    printer::FALLBACK_DIR.to_string()
}

fn default_width() -> String {
    api_defaults::WIDTH.to_string()
}

fn default_height() -> String {
    api_defaults::HEIGHT.to_string()
}

fn default_left() -> String {
    api_defaults::LEFT.to_string()
}

fn default_top() -> String {
    api_defaults::TOP.to_string()
}

fn default_window_width() -> f32 {
    900.0
}

fn default_window_height() -> f32 {
    760.0
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            drive: default_drive(),
            fallback_dir: default_fallback_dir(),
        }
    }
}

impl Default for PrintDefaults {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            left: default_left(),
            top: default_top(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            service: ServiceSettings::default(),
            printer: PrinterSettings::default(),
            storage: StorageSettings::default(),
            defaults: PrintDefaults::default(),
            window: WindowSettings::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    /// Load configuration from a TOML file, writing defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, creating default config");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from {}", path.display()))?;

        config.validate();
        info!(path = %path.display(), endpoint = %config.service.endpoint, "Loaded config");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Apply `REFINE_*` environment variables on top of the loaded file
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("REFINE_ENDPOINT") {
            self.service.endpoint = endpoint;
        }
        if let Some(dir) = lookup("REFINE_IMAGES_DIR") {
            self.storage.images_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup("REFINE_OUTPUT_DIR") {
            self.storage.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(drive) = lookup("REFINE_DRIVE") {
            self.printer.drive = drive;
        }
        self.validate();
    }

    /// Replace values that cannot work with their defaults
    fn validate(&mut self) {
        if self.service.endpoint.trim().is_empty() {
            warn!("service.endpoint is empty, using default");
            self.service.endpoint = default_endpoint();
        }

        if self.service.timeout_ms == 0 {
            warn!(default = default_timeout_ms(), "service.timeout_ms is 0, using default");
            self.service.timeout_ms = default_timeout_ms();
        }

        if !is_drive_prefix(&self.printer.drive) {
            warn!(drive = %self.printer.drive, "printer.drive is not of the form 'X:', using default");
            self.printer.drive = default_drive();
        }

        if self.printer.fallback_dir.trim().is_empty() {
            warn!("printer.fallback_dir is empty, using default");
            self.printer.fallback_dir = default_fallback_dir();
        }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.storage
            .images_dir
            .clone()
            .unwrap_or_else(|| data_dir().join(config::IMAGES_SUBDIR))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.storage
            .output_dir
            .clone()
            .unwrap_or_else(|| data_dir().join(config::OUTPUT_SUBDIR))
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(config::APP_DIR)
}

fn is_drive_prefix(drive: &str) -> bool {
    let bytes = drive.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.service.endpoint, "http://localhost:9090/api/refine/");
        assert_eq!(config.printer.drive, "D:");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [service]
            endpoint = "http://printer.local/api/refine/"
            "#,
        )
        .unwrap();
        assert_eq!(config.service.endpoint, "http://printer.local/api/refine/");
        assert_eq!(config.service.timeout_ms, 10_000);
        assert_eq!(config.defaults.width, "100");
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_then_load_preserves_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.storage.output_dir = Some(PathBuf::from("/srv/print"));
        config.printer.drive = "E:".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.storage.output_dir, Some(PathBuf::from("/srv/print")));
        assert_eq!(loaded.storage.images_dir, None);
        assert_eq!(loaded.printer.drive, "E:");
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service\nendpoint = ").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars = HashMap::from([
            ("REFINE_ENDPOINT", "http://10.0.0.5:9090/api/refine/"),
            ("REFINE_OUTPUT_DIR", "/mnt/d/copyfolder"),
            ("REFINE_DRIVE", "e:"),
        ]);
        let mut config = Config::default();
        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.service.endpoint, "http://10.0.0.5:9090/api/refine/");
        assert_eq!(config.storage.output_dir, Some(PathBuf::from("/mnt/d/copyfolder")));
        assert_eq!(config.storage.images_dir, None);
        assert_eq!(config.printer.drive, "e:");
    }

    #[test]
    fn test_validate_replaces_unusable_values() {
        let mut config = Config::default();
        config.service.endpoint = "  ".to_string();
        config.service.timeout_ms = 0;
        config.printer.drive = "D:\\".to_string();
        config.validate();

        assert_eq!(config.service.endpoint, service::DEFAULT_ENDPOINT);
        assert_eq!(config.service.timeout_ms, service::DEFAULT_TIMEOUT_MS);
        assert_eq!(config.printer.drive, "D:");
    }

    #[test]
    fn test_storage_dirs_prefer_explicit_paths() {
        let mut config = Config::default();
        config.storage.images_dir = Some(PathBuf::from("/data/images"));

        assert_eq!(config.images_dir(), PathBuf::from("/data/images"));
        assert!(config.output_dir().ends_with("refine-print-panel/Output"));
    }
}
