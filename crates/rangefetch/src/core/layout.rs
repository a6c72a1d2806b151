use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};

/// Local file name for a URL: the last non-empty path segment, or the
/// authority when the path is empty. Query and fragment are ignored.
///
/// # Examples
///
/// ```
/// use rangefetch::core::resource_name;
///
/// assert_eq!(resource_name("https://host/pub/file.iso?sig=1").unwrap(), "file.iso");
/// assert_eq!(resource_name("http://127.0.0.1:8080").unwrap(), "127.0.0.1:8080");
/// ```
pub fn resource_name(url: &str) -> Result<String> {
    let trimmed = url.trim();
    let without_query = trimmed.split(['?', '#']).next().unwrap_or_default();
    let rest = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));

    let name = path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(authority);

    if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
        return Err(FetchError::InvalidConfiguration(format!(
            "cannot derive a file name from URL {url:?}"
        )));
    }
    Ok(name.to_string())
}

/// Where one resource lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// `<dest_dir>/<name>`
    pub destination: PathBuf,
    /// `<dest_dir>/<name>.chunks`, one file per range index.
    pub chunk_dir:   PathBuf,
    /// `<dest_dir>/<name>.part`, used when the resource is fetched single-stream.
    pub part_file:   PathBuf,
}

impl Layout {
    pub fn new(dest_dir: &Path, name: &str) -> Self {
        Self {
            destination: dest_dir.join(name),
            chunk_dir:   dest_dir.join(format!("{name}.chunks")),
            part_file:   dest_dir.join(format!("{name}.part")),
        }
    }

    pub fn chunk_path(&self, index: usize) -> PathBuf { chunk_path(&self.chunk_dir, index) }
}

pub fn chunk_path(chunk_dir: &Path, index: usize) -> PathBuf { chunk_dir.join(index.to_string()) }
