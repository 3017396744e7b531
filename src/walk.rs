use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// One regular file found under the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Directory containing the file
    pub dir: PathBuf,
    /// File name within `dir`, lossily converted to UTF-8
    pub name: String,
}

impl SourceFile {
    /// Full path of the file
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }
}

/// A single unreadable entry; the walk continues past it
#[derive(Error, Debug)]
#[error("{0}")]
pub struct WalkError(#[from] walkdir::Error);

/// Lazily yields every regular file under `root`, entries sorted by file name.
///
/// Unreadable entries (permission errors, broken or cyclic links) come out as
/// `Err` items so the caller can skip them without losing the rest of the
/// tree.
pub fn walk_sources(root: &Path) -> impl Iterator<Item = Result<SourceFile, WalkError>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    return None;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                let dir = entry
                    .path()
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                Some(Ok(SourceFile { dir, name }))
            }
            Err(e) => Some(Err(WalkError::from(e))),
        })
}
