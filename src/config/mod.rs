//! Configuration for the catalogue browser
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/drugstore/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! The `--data` flag is applied on top by `main`.

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod loader;
mod observability;
mod serialization;
mod ui;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use loader::{FileLoader, LoaderConfig};
pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use ui::{FileUi, UiConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dataset location served by the static site
pub const DEFAULT_DATA_SOURCE: &str = "/data/data.json";

/// Where relative dataset paths are fetched from
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const DEFAULT_THEME: &str = "dark";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Dataset URL, site-relative path, or local file
    pub data_source: String,

    /// Origin that site-relative data paths resolve against
    pub base_url: String,

    /// Theme name: "dark", "light", "nord"
    pub theme: String,

    /// Fetch and cache settings
    pub loader: LoaderConfig,

    /// Interaction timing and layout
    pub ui: UiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            theme: DEFAULT_THEME.to_string(),
            loader: LoaderConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub data_source: Option<String>,
    pub base_url: Option<String>,
    pub theme: Option<String>,

    /// Optional [loader] section
    pub loader: Option<FileLoader>,

    /// Optional [ui] section
    pub ui: Option<FileUi>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/drugstore/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("drugstore").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A file that exists but does not parse is fatal: falling back to
    /// defaults would hide the user's mistake.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Numbers written as strings (use 300, not \"300\")");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  Run `drugstore config --reset` to start over.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        Self::from_sources(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        // Data source: env > file > default
        let data_source = env("DRUGSTORE_DATA")
            .or(file.data_source)
            .unwrap_or_else(|| DEFAULT_DATA_SOURCE.to_string());

        let base_url = env("DRUGSTORE_BASE_URL")
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let theme = env("DRUGSTORE_THEME")
            .or(file.theme)
            .unwrap_or_else(|| DEFAULT_THEME.to_string());

        Self {
            data_source,
            base_url,
            theme,
            loader: LoaderConfig::from_file(file.loader),
            ui: UiConfig::from_file(file.ui),
            logging: LoggingConfig::from_file(file.logging),
        }
    }
}
