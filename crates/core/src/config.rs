//! Configuration for the mongocap auditor
//!
//! Configuration can be loaded from a TOML file and/or environment
//! variables. Environment variables are prefixed with `MONGOCAP_` and use
//! double underscores for nested values, e.g. `MONGOCAP_DATABASE__URI`.

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_PROVIDER: &str = "mongodb";
const DEFAULT_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "backdrop";

/// Name of the per-directory config file looked up when no path is given
const LOCAL_CONFIG_FILE: &str = "mongocap.toml";

/// Main configuration structure for the mongocap auditor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database connection configuration
    pub database: DatabaseConfig,
}

/// Configuration for the audited database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Provider type: "mongodb" or "mock"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Connection string for the database server
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Name of the database holding the audited collections
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            uri: default_uri(),
            database: default_database(),
        }
    }
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_uri() -> String {
    DEFAULT_URI.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.mongocap/config.toml` and applies
/// when no explicit or per-directory config is found.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".mongocap").join("config.toml"))
}

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration, resolving the file to read in order of
    /// preference: the explicit path, `./mongocap.toml`, then the global
    /// config. Missing files fall back to defaults; an explicit path that
    /// does not exist is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }

        Self::from_file(&global_config_path()?)
    }

    /// Loads configuration from a TOML file with environment variable
    /// overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        // Set defaults explicitly (config crate doesn't apply serde
        // defaults for missing sections)
        let mut builder = Self::builder_with_defaults()?;

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        Self::finish(builder)
    }

    /// Parses configuration from a TOML string (used by tests)
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let builder = Self::builder_with_defaults()?
            .add_source(File::from_str(toml, config::FileFormat::Toml));
        Self::finish(builder)
    }

    fn builder_with_defaults() -> Result<LibConfigBuilder<config::builder::DefaultState>> {
        let builder = ConfigLib::builder();
        let builder = set_config_default(builder, "database.provider", DEFAULT_PROVIDER)?;
        let builder = set_config_default(builder, "database.uri", DEFAULT_URI)?;
        set_config_default(builder, "database.database", DEFAULT_DATABASE)
    }

    fn finish(builder: LibConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings = builder
            .add_source(Environment::with_prefix("MONGOCAP").separator("__"))
            .build()
            .map_err(|e| Error::config(format!("Failed to build configuration: {e}")))?;

        settings
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to parse configuration: {e}")))
    }
}
