//! Manifest construction from dataset directories
//!
//! For every dataset the builder walks the source directory recursively,
//! keeps files whose name ends in `.obj`, optionally rewrites their paths
//! relative to a server root, truncates to the sample cap and finally writes
//! the whole manifest in one atomic replace.

use crate::manifest::Manifest;
use crate::sources::DatasetSources;
use objview_common::path::relative_to;
use objview_common::{DEFAULT_SOURCE_SPEC, Error, MANIFEST_FILE_NAME, OBJ_SUFFIX, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Pick the dataset mapping for a build.
///
/// Exactly one of an explicit mapping or a mapping file may be given; giving
/// both is a conflict even when the explicit mapping is empty. With no mapping
/// file and no (or an empty) explicit mapping, `data.json` in the working
/// directory is read and must exist.
pub fn resolve_sources(
    explicit: Option<DatasetSources>,
    mapping_file: Option<&Path>,
) -> Result<DatasetSources> {
    resolve_sources_or(explicit, mapping_file, Path::new(DEFAULT_SOURCE_SPEC))
}

/// [`resolve_sources`] with `default_mapping` read in place of `data.json`
pub fn resolve_sources_or(
    explicit: Option<DatasetSources>,
    mapping_file: Option<&Path>,
    default_mapping: &Path,
) -> Result<DatasetSources> {
    match (explicit, mapping_file) {
        (Some(_), Some(_)) => Err(Error::ConflictingSources),
        (Some(sources), None) if !sources.is_empty() => Ok(sources),
        (None, Some(path)) => DatasetSources::from_json_file(path),
        (_, None) => {
            debug!("No dataset mapping given, reading {}", default_mapping.display());
            DatasetSources::from_json_file(default_mapping)
        }
    }
}

/// Options controlling a manifest build
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Rewrite paths relative to this directory when set
    pub relative_root: Option<PathBuf>,
    /// Keep at most this many files per dataset
    pub sample_cap: Option<usize>,
    /// Sort each dataset by file name after truncation
    pub sort_by_file_name: bool,
    /// Destination of the manifest
    pub output: PathBuf,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            relative_root: None,
            sample_cap: None,
            sort_by_file_name: false,
            output: PathBuf::from(MANIFEST_FILE_NAME),
        }
    }
}

/// Outcome of a build: per-dataset counts in manifest order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub datasets: Vec<(String, usize)>,
}

impl BuildReport {
    /// Total number of files written
    #[must_use]
    pub fn total(&self) -> usize {
        self.datasets.iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .output
            .file_name()
            .map_or_else(|| self.output.display().to_string(), |n| n.to_string_lossy().into_owned());
        write!(f, "Created {name} with {} total OBJ files", self.total())?;
        for (key, count) in &self.datasets {
            write!(f, "\n  - {key}: {count} OBJ files")?;
        }
        Ok(())
    }
}

/// Builds manifests according to a set of [`BuildOptions`]
pub struct ManifestBuilder {
    options: BuildOptions,
}

impl ManifestBuilder {
    #[must_use]
    pub const fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Collect every dataset whose directory exists, without writing anything
    #[must_use]
    pub fn collect(&self, sources: &DatasetSources) -> Manifest {
        let mut manifest = Manifest::new();
        for (key, dir) in sources.iter() {
            let Some(dir) = dir.filter(|d| d.exists()) else {
                warn!(
                    "Skipping dataset '{}': directory {} does not exist",
                    key,
                    dir.map_or_else(|| "<none>".to_string(), |d| d.display().to_string())
                );
                continue;
            };

            let mut files = self.collect_dataset(dir);
            if let Some(cap) = self.options.sample_cap {
                files.truncate(cap);
            }
            info!("Dataset '{}': {} OBJ files from {}", key, files.len(), dir.display());
            manifest.insert(key, files);
        }

        if self.options.sort_by_file_name {
            manifest.sort_by_file_name();
        }
        manifest
    }

    /// Collect and write the manifest, replacing any previous file
    pub fn build(&self, sources: &DatasetSources) -> Result<BuildReport> {
        let manifest = self.collect(sources);
        manifest.write_atomic(&self.options.output)?;
        info!(
            "Wrote {} datasets to {}",
            manifest.len(),
            self.options.output.display()
        );

        Ok(BuildReport {
            output: self.options.output.clone(),
            datasets: manifest
                .iter()
                .map(|(key, files)| (key.to_string(), files.len()))
                .collect(),
        })
    }

    /// All `.obj` files under `root` in walk order
    fn collect_dataset(&self, root: &Path) -> Vec<String> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            // symlinks to directories are not descended into, nor recorded
            if entry.path().is_dir() {
                continue;
            }
            if !entry
                .file_name()
                .as_encoded_bytes()
                .ends_with(OBJ_SUFFIX.as_bytes())
            {
                continue;
            }
            if let Some(path) = self.record_path(entry.path()) {
                files.push(path);
            }
        }
        debug!("Found {} OBJ files under {}", files.len(), root.display());
        files
    }

    /// Manifest entry for `path`; `None` when the path is not valid UTF-8,
    /// since the manifest could not name the file faithfully
    fn record_path(&self, path: &Path) -> Option<String> {
        let Some(absolute) = path.to_str() else {
            warn!("Skipping file with a non UTF-8 path: {}", path.display());
            return None;
        };
        let Some(server_root) = &self.options.relative_root else {
            return Some(absolute.to_string());
        };
        let Some(rel) = relative_to(path, server_root) else {
            warn!("Could not make path relative: {}", path.display());
            return Some(absolute.to_string());
        };
        rel.to_str().map(str::to_string).or_else(|| {
            warn!("Skipping file with a non UTF-8 relative path: {}", rel.display());
            None
        })
    }
}
