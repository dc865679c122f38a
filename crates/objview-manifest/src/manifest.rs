//! The persisted dataset manifest
//!
//! A manifest maps dataset keys to ordered lists of file paths. Key order is
//! the order datasets were inserted and is kept on disk.

use objview_common::path::file_name_key;
use objview_common::{Error, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Ordered mapping of dataset key to file paths
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    datasets: Vec<(String, Vec<String>)>,
}

impl Manifest {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            datasets: Vec::new(),
        }
    }

    /// Insert a dataset, replacing the files of an existing key in place
    pub fn insert(&mut self, key: impl Into<String>, files: Vec<String>) {
        let key = key.into();
        if let Some(slot) = self.datasets.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = files;
        } else {
            self.datasets.push((key, files));
        }
    }

    /// Files recorded for a dataset
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.datasets
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, files)| files.as_slice())
    }

    /// Dataset keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.datasets
            .iter()
            .map(|(k, files)| (k.as_str(), files.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Number of files across all datasets
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.datasets.iter().map(|(_, files)| files.len()).sum()
    }

    /// Sort every dataset's files by file name (stable)
    pub fn sort_by_file_name(&mut self) {
        for (_, files) in &mut self.datasets {
            files.sort_by(|a, b| file_name_key(a).cmp(file_name_key(b)));
        }
    }

    /// Render as JSON indented with four spaces
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .map_err(|e| Error::serialization(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Read a manifest from disk
    pub fn read(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ManifestNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&contents).map_err(|e| Error::ManifestInvalid(e.to_string()))
    }

    /// Replace the manifest file atomically.
    ///
    /// The JSON is written to a temporary file in the destination directory
    /// and renamed over `path`, so readers see either the old or the new
    /// manifest and never a partial one. The result keeps the permissions of
    /// the file it replaces; a new file gets the umask default, like any
    /// freshly created file.
    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // masked by the process umask on open
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(dir)?;
        if let Ok(existing) = std::fs::metadata(path) {
            tmp.as_file().set_permissions(existing.permissions())?;
        }
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.datasets.len()))?;
        for (key, files) in &self.datasets {
            map.serialize_entry(key, files)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = Manifest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping dataset names to lists of paths")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Manifest, A::Error> {
                let mut manifest = Manifest::new();
                while let Some((key, files)) = access.next_entry::<String, Vec<String>>()? {
                    manifest.insert(key, files);
                }
                Ok(manifest)
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}
