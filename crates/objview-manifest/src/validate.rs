//! Manifest shape checks for the comparison view
//!
//! The comparison page shows two datasets side by side, sample by sample,
//! so the manifest must hold exactly two lists of the same length.

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a manifest cannot back the comparison view
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("{} is not valid JSON: {reason}", .path.display())]
    InvalidJson { path: PathBuf, reason: String },

    #[error("manifest must be a JSON object mapping dataset names to file lists, found {found}")]
    NotAnObject { found: &'static str },

    #[error("comparison requires exactly 2 datasets, found {count}: [{}]", .keys.join(", "))]
    WrongDatasetCount { count: usize, keys: Vec<String> },

    #[error("dataset '{key}' must be a list of files, found {found}")]
    NotAList { key: String, found: &'static str },

    #[error(
        "datasets must have the same number of samples: '{first_key}' has {first_len}, '{second_key}' has {second_len}"
    )]
    LengthMismatch {
        first_key: String,
        first_len: usize,
        second_key: String,
        second_len: usize,
    },
}

/// Read the manifest at `path` and check it for the comparison view
pub fn validate_comparison_file(path: &Path) -> Result<(), ValidationError> {
    let contents = std::fs::read_to_string(path).map_err(|e| read_error(path, &e))?;
    validate_comparison_str(path, &contents)
}

/// Check manifest text already read from `path`
pub fn validate_comparison_str(path: &Path, contents: &str) -> Result<(), ValidationError> {
    let value: Value =
        serde_json::from_str(contents).map_err(|e| ValidationError::InvalidJson {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_comparison(&value)
}

/// Map a failed manifest read to the matching validation error
#[must_use]
pub fn read_error(path: &Path, err: &std::io::Error) -> ValidationError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ValidationError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        ValidationError::Unreadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

/// Check a parsed manifest: an object with exactly two list values of equal length
pub fn validate_comparison(value: &Value) -> Result<(), ValidationError> {
    let Value::Object(map) = value else {
        return Err(ValidationError::NotAnObject {
            found: json_type(value),
        });
    };

    if map.len() != 2 {
        return Err(ValidationError::WrongDatasetCount {
            count: map.len(),
            keys: map.keys().cloned().collect(),
        });
    }

    let mut lists = Vec::with_capacity(2);
    for (key, files) in map {
        let Value::Array(files) = files else {
            return Err(ValidationError::NotAList {
                key: key.clone(),
                found: json_type(files),
            });
        };
        lists.push((key, files.len()));
    }

    let (first_key, first_len) = lists[0];
    let (second_key, second_len) = lists[1];
    if first_len != second_len {
        return Err(ValidationError::LengthMismatch {
            first_key: first_key.clone(),
            first_len,
            second_key: second_key.clone(),
            second_len,
        });
    }
    Ok(())
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
