use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Default ceiling for files opened into the viewer (10 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Limits and locations used when opening a file into the viewer.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    pub max_file_bytes: u64,
    pub temp_dir: PathBuf,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            temp_dir: std::env::temp_dir(),
        }
    }
}

/// A file that has been copied into a temporary location for viewing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    /// The file the user selected.
    pub source: PathBuf,
    /// The persisted `explorer-*.txt` copy.
    pub materialized: PathBuf,
    pub size: u64,
}

impl OpenedFile {
    /// Read the materialized copy back as text, replacing invalid UTF-8.
    pub fn read_content(&self) -> Result<String> {
        let bytes = fs::read(&self.materialized)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Check the size ceiling, read `path` and persist its content as a temp file.
///
/// Only regular files are accepted. The read itself is capped at the limit,
/// so a file that grows after the metadata check is still rejected.
/// The temp file is never removed by the program.
pub fn materialize(path: &Path, opts: &OpenOptions) -> Result<OpenedFile> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Err(AppError::InvalidPath(format!(
            "{}: not a regular file",
            path.display()
        )));
    }
    let limit = opts.max_file_bytes;
    if meta.len() > limit {
        return Err(AppError::FileTooLarge {
            size: meta.len(),
            limit,
        });
    }

    let mut content = Vec::new();
    fs::File::open(path)?
        .take(limit.saturating_add(1))
        .read_to_end(&mut content)?;
    if content.len() as u64 > limit {
        return Err(AppError::FileTooLarge {
            size: content.len() as u64,
            limit,
        });
    }
    let mut tmp = tempfile::Builder::new()
        .prefix("explorer-")
        .suffix(".txt")
        .tempfile_in(&opts.temp_dir)?;
    tmp.write_all(&content)?;
    tmp.flush()?;
    let (_, materialized) = tmp.keep().map_err(|e| AppError::Io(e.error))?;

    Ok(OpenedFile {
        source: path.to_path_buf(),
        materialized,
        size: content.len() as u64,
    })
}
