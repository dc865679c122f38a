//! objview Common - Shared types and utilities
//!
//! This crate provides the error type, configuration structures, and path
//! helpers used by both the manifest builder and the file server.

pub mod config;
pub mod error;
pub mod path;

pub use config::{LoggingConfig, ServeConfig, ServerConfig};
pub use error::{Error, Result};

/// File name of the manifest written by the builder and read by the server
pub const MANIFEST_FILE_NAME: &str = "data_files.json";

/// Dataset mapping file read by the builder when no mapping is supplied
pub const DEFAULT_SOURCE_SPEC: &str = "data.json";

/// Suffix a file name must end with to be recorded in the manifest
pub const OBJ_SUFFIX: &str = ".obj";
