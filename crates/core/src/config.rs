//! Application configuration.
//!
//! Values come from `<config_dir>/carcompare/config.toml` (optional), overridden by
//! environment variables prefixed with `CARCOMPARE__`, e.g.
//! `CARCOMPARE__API_BASE_URL=http://cars.internal:8080`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory under the user's config directory holding our files.
pub const CONFIG_DIR_NAME: &str = "carcompare";
/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# carcompare configuration

# Base URL of the car catalog API. The client requests `<api_base_url>/api/cars`.
api_base_url = "http://localhost:8080"

# Value sent as the `limit` query parameter.
catalog_limit = 100

[dev_server]
host = "0.0.0.0"
# The dev server refuses to start if this port is taken.
port = 5173
static_dir = "dist"
"#;

/// Settings for the local development server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Fixed port.
    pub port: u16,
    /// Directory with the built frontend (must contain `index.html`).
    pub static_dir: PathBuf,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5173,
            static_dir: PathBuf::from("dist"),
        }
    }
}

/// Top-level configuration shared by the frontend and the dev server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the catalog API.
    pub api_base_url: String,
    /// Maximum number of cars requested per fetch.
    pub catalog_limit: u32,
    /// Dev server settings.
    pub dev_server: DevServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            catalog_limit: 100,
            dev_server: DevServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default location layered with environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from an explicit file (which may be missing) layered with environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("CARCOMPARE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }
}

/// Path of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Write the default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = default_config_path();
    ensure_default_config_at(&path)?;
    Ok(path)
}

/// Write the default configuration to `path` unless a file is already there.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!(path = %path.display(), "wrote default configuration");
    Ok(())
}
