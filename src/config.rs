//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.
//!
//! The only durable client state is the current student's name and the
//! high-contrast preference; everything else is service wiring.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME};

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Persisted student identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StudentConfig {
    /// Name of the student currently using the board (empty = not set up)
    #[serde(default)]
    pub name: String,
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// High-contrast rendering (black borders, no tinted backgrounds)
    #[serde(default)]
    pub high_contrast: bool,
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

/// Endpoints and timing for the external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the relay functions (e.g. `https://<project>/functions/v1`)
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    /// Public (anon) key sent as bearer token to the relay, if it requires one
    #[serde(default)]
    pub anon_key: Option<String>,
    /// Base URL serving the local `/symbols/*.png` assets
    #[serde(default = "default_symbols_base_url")]
    pub symbols_base_url: String,
    /// Remote symbol mirror, addressed by label slug
    #[serde(default = "default_mirror_base_url")]
    pub mirror_base_url: String,
    /// Safety timeout that always releases the board lock
    #[serde(default = "default_notify_lock_ms")]
    pub notify_lock_ms: u64,
    /// Timeout for image existence probes
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Timeout for relay requests
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_relay_url() -> String {
    "http://127.0.0.1:3030/functions/v1".to_string()
}

fn default_symbols_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_mirror_base_url() -> String {
    "https://raw.githubusercontent.com/chaeyoonyunakim/getting-started-with-mackathon/main/public/symbols"
        .to_string()
}

const fn default_notify_lock_ms() -> u64 {
    2000
}

const fn default_probe_timeout_ms() -> u64 {
    3000
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            anon_key: None,
            symbols_base_url: default_symbols_base_url(),
            mirror_base_url: default_mirror_base_url(),
            notify_lock_ms: default_notify_lock_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ServiceConfig {
    /// Backstop for the board lock.
    pub const fn notify_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_lock_ms)
    }

    /// Bounded time for an image existence check.
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Bounded time for a relay round-trip.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Optional catalog override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// TOML catalog file replacing the built-in categories
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/ChoiceBoard/config.toml`
/// - macOS: `~/Library/Application Support/ChoiceBoard/config.toml`
/// - Windows: `%APPDATA%\ChoiceBoard\config.toml`
///
/// `CHOICEBOARD_CONFIG_DIR` overrides the directory.
///
/// # Validation
///
/// - relay and asset URLs must be http(s)
/// - all timeouts must be non-zero
/// - catalog path, when set, must exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Current student
    #[serde(default)]
    pub student: StudentConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
    /// External service wiring
    #[serde(default)]
    pub services: ServiceConfig,
    /// Catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// A board is ready for use once a student has been named.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.student.name.trim().is_empty()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/ChoiceBoard/`
    /// - macOS: `~/Library/Application Support/ChoiceBoard/`
    /// - Windows: `%APPDATA%\ChoiceBoard\`
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit path.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("relay_url", &self.services.relay_url),
            ("symbols_base_url", &self.services.symbols_base_url),
            ("mirror_base_url", &self.services.mirror_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("services.{name} must be an http(s) URL, got '{url}'");
            }
        }

        for (name, value) in [
            ("notify_lock_ms", self.services.notify_lock_ms),
            ("probe_timeout_ms", self.services.probe_timeout_ms),
            ("request_timeout_ms", self.services.request_timeout_ms),
        ] {
            if value == 0 {
                anyhow::bail!("services.{name} must be greater than zero");
            }
        }

        if let Some(path) = &self.catalog.path {
            if !path.exists() {
                anyhow::bail!("Catalog file does not exist: {}", path.display());
            }
        }

        Ok(())
    }

    /// Stores a new student name (trimmed).
    pub fn set_student(&mut self, name: &str) {
        self.student.name = name.trim().to_string();
    }

    /// Forgets the current student. Only used by an explicit identity reset.
    pub fn clear_student(&mut self) {
        self.student.name.clear();
    }

    /// Flips the high-contrast preference and returns the new value.
    pub fn toggle_high_contrast(&mut self) -> bool {
        self.ui.high_contrast = !self.ui.high_contrast;
        self.ui.high_contrast
    }
}
