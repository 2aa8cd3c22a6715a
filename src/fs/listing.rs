use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{AppError, Result};

/// Default time a cached listing stays valid.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

/// Classification of a single directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Executable,
}

/// One raw entry as reported by a [`DirSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl RawEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The classified contents of one directory at one point in time.
///
/// Item order for cursor purposes is `subdirs ++ files ++ executables`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    pub path: PathBuf,
    pub subdirs: Vec<String>,
    pub files: Vec<String>,
    pub executables: Vec<String>,
}

impl DirectoryListing {
    /// Build a listing by partitioning raw entries, keeping read order.
    pub fn from_entries(path: PathBuf, entries: Vec<RawEntry>) -> Self {
        let mut listing = DirectoryListing {
            path,
            ..Default::default()
        };
        for entry in entries {
            match entry.kind {
                EntryKind::Directory => listing.subdirs.push(entry.name),
                EntryKind::File => listing.files.push(entry.name),
                EntryKind::Executable => listing.executables.push(entry.name),
            }
        }
        listing
    }

    /// Running prefix sums of the three regions: `(dirs, dirs+files, total)`.
    pub fn boundaries(&self) -> (usize, usize, usize) {
        let d = self.subdirs.len();
        let f = d + self.files.len();
        let e = f + self.executables.len();
        (d, f, e)
    }

    pub fn total(&self) -> usize {
        self.boundaries().2
    }

    /// Resolve a cursor index into its region and entry name.
    pub fn item(&self, index: usize) -> Option<(EntryKind, &str)> {
        let (d, f, e) = self.boundaries();
        if index < d {
            Some((EntryKind::Directory, self.subdirs[index].as_str()))
        } else if index < f {
            Some((EntryKind::File, self.files[index - d].as_str()))
        } else if index < e {
            Some((EntryKind::Executable, self.executables[index - f].as_str()))
        } else {
            None
        }
    }

    /// Iterate all items in cursor order.
    pub fn items(&self) -> impl Iterator<Item = (EntryKind, &str)> {
        self.subdirs
            .iter()
            .map(|n| (EntryKind::Directory, n.as_str()))
            .chain(self.files.iter().map(|n| (EntryKind::File, n.as_str())))
            .chain(
                self.executables
                    .iter()
                    .map(|n| (EntryKind::Executable, n.as_str())),
            )
    }
}

/// Disk access layer used by the lister.
pub trait DirSource: Send {
    fn read_dir(&self, path: &Path) -> std::io::Result<Vec<RawEntry>>;
}

/// Reads directories from the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskSource;

impl DirSource for DiskSource {
    fn read_dir(&self, path: &Path) -> std::io::Result<Vec<RawEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            let name = entry.file_name().to_string_lossy().to_string();
            // Symlinks are classified by their target; dangling ones count as files.
            let kind = match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(meta) if is_executable(&meta) => EntryKind::Executable,
                _ => EntryKind::File,
            };
            entries.push(RawEntry::new(name, kind));
        }
        Ok(entries)
    }
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.is_file() && meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    false
}

/// Lexically clean a path: drop `.` segments and resolve `..` against
/// preceding segments. Symlinks are not resolved.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_relative_top = matches!(
                    out.components().next_back(),
                    None | Some(Component::ParentDir)
                );
                if at_relative_top && !out.has_root() {
                    out.push("..");
                } else {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// A cached listing and the instant it was read from disk.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub listing: Arc<DirectoryListing>,
    pub fetched_at: Instant,
}

/// Listing cache keyed by cleaned path.
///
/// Entries are only ever overwritten; stale ones are ignored at read time.
#[derive(Debug)]
pub struct ListingCache {
    entries: HashMap<PathBuf, CacheEntry>,
    ttl: Duration,
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl ListingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Return the cached listing for `path` if it is younger than the TTL at `now`.
    pub fn get_fresh(&self, path: &Path, now: Instant) -> Option<Arc<DirectoryListing>> {
        let entry = self.entry(path)?;
        if now.saturating_duration_since(entry.fetched_at) < self.ttl {
            Some(Arc::clone(&entry.listing))
        } else {
            None
        }
    }

    pub fn insert(&mut self, path: PathBuf, listing: Arc<DirectoryListing>, now: Instant) {
        self.entries.insert(
            path,
            CacheEntry {
                listing,
                fetched_at: now,
            },
        );
    }

    pub fn entry(&self, path: &Path) -> Option<&CacheEntry> {
        self.entries.get(path)
    }
}

/// Reads and classifies directories through a time-bounded cache.
pub struct DirectoryLister {
    source: Box<dyn DirSource>,
    cache: ListingCache,
    show_hidden: bool,
}

impl DirectoryLister {
    pub fn new(source: Box<dyn DirSource>, cache: ListingCache, show_hidden: bool) -> Self {
        Self {
            source,
            cache,
            show_hidden,
        }
    }

    /// Lister over the real filesystem.
    pub fn disk(cache: ListingCache, show_hidden: bool) -> Self {
        Self::new(Box::new(DiskSource), cache, show_hidden)
    }

    #[cfg(test)]
    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    /// List `path`, serving from cache while the entry is fresh.
    pub fn list(&mut self, path: &Path) -> Result<Arc<DirectoryListing>> {
        self.list_at(path, Instant::now())
    }

    /// [`list`](Self::list) with an explicit clock reading.
    pub fn list_at(&mut self, path: &Path, now: Instant) -> Result<Arc<DirectoryListing>> {
        let path = clean_path(path);
        if let Some(listing) = self.cache.get_fresh(&path, now) {
            debug!(path = %path.display(), "listing cache hit");
            return Ok(listing);
        }

        debug!(path = %path.display(), "listing cache miss");
        let entries = self
            .source
            .read_dir(&path)
            .map_err(|source| AppError::ListDir {
                path: path.clone(),
                source,
            })?;
        let entries = if self.show_hidden {
            entries
        } else {
            entries
                .into_iter()
                .filter(|e| !e.name.starts_with('.'))
                .collect()
        };

        let listing = Arc::new(DirectoryListing::from_entries(path.clone(), entries));
        self.cache.insert(path, Arc::clone(&listing), now);
        Ok(listing)
    }
}
