//! Lexical path helpers
//!
//! None of these touch the filesystem beyond resolving the working
//! directory; symlinks are not followed.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Normalize a path lexically.
///
/// Collapses redundant separators, drops `.` components and folds `..`
/// into the preceding normal component. Leading `..` of a relative path is
/// kept; `..` directly under the root is dropped. An empty result is `.`.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Express `path` relative to `base`.
///
/// Both sides are made absolute against the working directory and
/// normalized first, so the result may start with `..`. Returns `None`
/// when the two paths share no root (different drive prefixes).
#[must_use]
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path = normalize(&std::path::absolute(path).ok()?);
    let base = normalize(&std::path::absolute(base).ok()?);

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}

/// Sort key used to order manifest entries: the final path component
#[must_use]
pub fn file_name_key(path: &str) -> &OsStr {
    Path::new(path)
        .file_name()
        .unwrap_or_else(|| OsStr::new(path))
}
