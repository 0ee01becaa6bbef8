//! Recursive discovery of content files under a collection root

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::slug;

/// A content file found under a collection root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Path components relative to the root; the last one keeps its extension
    pub segments: Vec<String>,
    /// Full path of the file
    pub path: PathBuf,
}

impl ContentEntry {
    /// Slug derived from the relative path
    pub fn slug(&self, extension: &str) -> String {
        slug::resolve(&self.segments, extension)
    }
}

/// Walk `root` depth-first and return every `.{extension}` file at any depth.
///
/// Sibling order is whatever the filesystem yields and carries no meaning.
/// A missing root gives an empty list; unreadable directories and entries
/// are skipped without aborting the rest of the walk. Symlinks are not
/// followed, so nothing outside `root` is ever listed.
pub fn walk(root: &Path, extension: &str) -> Vec<ContentEntry> {
    if !root.is_dir() {
        tracing::debug!("Content root {:?} does not exist, treating as empty", root);
        return Vec::new();
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under {:?}: {}", root, e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_content_file(path, extension) {
            continue;
        }

        match relative_segments(root, path) {
            Some(segments) => entries.push(ContentEntry {
                segments,
                path: path.to_path_buf(),
            }),
            None => tracing::debug!("Skipping non UTF-8 path {:?}", path),
        }
    }

    entries
}

/// Check if a file carries the content extension
pub fn is_content_file(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == extension)
        .unwrap_or(false)
}

fn relative_segments(root: &Path, path: &Path) -> Option<Vec<String>> {
    let relative = path.strip_prefix(root).ok()?;
    relative
        .components()
        .map(|c| c.as_os_str().to_str().map(str::to_string))
        .collect()
}
