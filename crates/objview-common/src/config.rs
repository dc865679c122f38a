//! Configuration types for objview
//!
//! The server reads an optional TOML file with these structures. Every field
//! has a default so a partial (or missing) file is valid; command-line flags
//! are merged on top by the binary.

use crate::{Error, MANIFEST_FILE_NAME, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration file structure for `objview-serve`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServeConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::configuration(e.to_string()))
    }
}

/// HTTP server settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (all interfaces by default)
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the pages, the manifest and the scripts directory
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Manifest file name, resolved against `root`
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
    /// Script assets directory, resolved against `root`
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,
    /// Check the manifest shape before serving the comparison page
    #[serde(default = "default_validate_comparison")]
    pub validate_comparison: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root: default_root(),
            manifest_file: default_manifest_file(),
            scripts_dir: default_scripts_dir(),
            validate_comparison: default_validate_comparison(),
        }
    }
}

impl ServerConfig {
    /// Full path of the manifest file
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest_file)
    }

    /// Full path of the script assets directory
    #[must_use]
    pub fn scripts_path(&self) -> PathBuf {
        self.root.join(&self.scripts_dir)
    }

    /// `host:port` string to bind
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_manifest_file() -> String {
    MANIFEST_FILE_NAME.to_string()
}

fn default_scripts_dir() -> String {
    "js".to_string()
}

const fn default_validate_comparison() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
