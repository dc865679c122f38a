//! Dataset source mapping used as builder input

use objview_common::{Error, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Ordered mapping of dataset key to the directory it is collected from.
///
/// A `None` directory marks a dataset with no source; it is skipped during
/// the build like a directory that does not exist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetSources {
    entries: Vec<(String, Option<PathBuf>)>,
}

impl DatasetSources {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a dataset; an existing key keeps its position and takes the new directory
    pub fn insert(&mut self, key: impl Into<String>, dir: Option<PathBuf>) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = dir;
        } else {
            self.entries.push((key, dir));
        }
    }

    /// Builder-style variant of [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.insert(key, Some(dir.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Path>)> {
        self.entries
            .iter()
            .map(|(k, dir)| (k.as_str(), dir.as_deref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a mapping file of the form `{"key": "dir" | null, ...}`
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::SourceSpecNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| Error::InvalidSourceSpec {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for DatasetSources {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SourcesVisitor;

        impl<'de> Visitor<'de> for SourcesVisitor {
            type Value = DatasetSources;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping dataset names to directories")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<DatasetSources, A::Error> {
                let mut sources = DatasetSources::new();
                while let Some((key, dir)) = access.next_entry::<String, Option<PathBuf>>()? {
                    sources.insert(key, dir);
                }
                Ok(sources)
            }
        }

        deserializer.deserialize_map(SourcesVisitor)
    }
}
