//! objview Manifest - dataset manifest construction and validation
//!
//! The builder walks dataset directories for `.obj` files and persists the
//! result as `data_files.json`. The validator checks that a manifest can
//! back the two-dataset comparison view.

pub mod builder;
pub mod manifest;
pub mod sources;
pub mod validate;

// Re-exports
pub use builder::{BuildOptions, BuildReport, ManifestBuilder, resolve_sources, resolve_sources_or};
pub use manifest::Manifest;
pub use sources::DatasetSources;
pub use validate::{
    ValidationError, read_error, validate_comparison, validate_comparison_file,
    validate_comparison_str,
};
