//! Keyed binary stores.
//!
//! The loader never touches files directly; it asks a [`KeyedStore`] for
//! entries by path (`/info.xml`, `/Materials.xml`, `/Primitives/LOD0/3001.g`).
//! Two stores are provided:
//!
//! - [`MemoryStore`] - entries held in memory, optionally loaded from a zip
//! - [`DirectoryStore`] - entries mapped onto an extracted archive directory
//!
//! # Path Rules
//!
//! Paths are normalized before lookup: backslashes become `/`, the leading
//! `/` is optional, empty and `.` segments are dropped. `..` segments are
//! rejected. Lookup is case-sensitive.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{ArchiveError, ArchiveResult};

/// Read-only access to named binary entries.
///
/// Implementations take `&self` everywhere so a store can be shared,
/// read-only, between loads.
pub trait KeyedStore {
    /// Read the full contents of an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::EntryNotFound`] if no entry exists at `path`,
    /// or another error if the path is invalid or the entry cannot be read.
    fn read_entry(&self, path: &str) -> ArchiveResult<Vec<u8>>;

    /// Check whether an entry exists at `path`.
    fn has_entry(&self, path: &str) -> bool;
}

impl<S: KeyedStore + ?Sized> KeyedStore for &S {
    fn read_entry(&self, path: &str) -> ArchiveResult<Vec<u8>> {
        (**self).read_entry(path)
    }

    fn has_entry(&self, path: &str) -> bool {
        (**self).has_entry(path)
    }
}

impl<S: KeyedStore + ?Sized> KeyedStore for Box<S> {
    fn read_entry(&self, path: &str) -> ArchiveResult<Vec<u8>> {
        (**self).read_entry(path)
    }

    fn has_entry(&self, path: &str) -> bool {
        (**self).has_entry(path)
    }
}

/// Normalize an entry path to the canonical `a/b/c` form.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidPath`] for empty paths and paths
/// containing `..`.
///
/// # Example
///
/// ```
/// use brick_archive::normalize_path;
///
/// assert_eq!(normalize_path("/Primitives/LOD0/3001.g").unwrap(), "Primitives/LOD0/3001.g");
/// assert_eq!(normalize_path("\\Materials.xml").unwrap(), "Materials.xml");
/// assert!(normalize_path("/../etc/passwd").is_err());
/// ```
pub fn normalize_path(path: &str) -> ArchiveResult<String> {
    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(ArchiveError::InvalidPath {
                    path: path.to_string(),
                    reason: "parent directory segments are not allowed",
                });
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(ArchiveError::InvalidPath {
            path: path.to_string(),
            reason: "path is empty",
        });
    }

    Ok(segments.join("/"))
}

// =============================================================================
// MemoryStore
// =============================================================================

/// A store holding every entry in memory.
///
/// # Example
///
/// ```
/// use brick_archive::{KeyedStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.insert("/info.xml", b"<info/>".to_vec()).unwrap();
///
/// assert!(store.has_entry("/info.xml"));
/// assert!(store.has_entry("info.xml"));
/// assert_eq!(store.read_entry("/info.xml").unwrap(), b"<info/>");
/// assert!(store.read_entry("/missing").unwrap_err().is_not_found());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidPath`] if `path` cannot be normalized.
    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) -> ArchiveResult<()> {
        let key = normalize_path(path)?;
        self.entries.insert(key, bytes.into());
        Ok(())
    }

    /// Load every file entry of a zip archive.
    ///
    /// Directory entries are skipped. Entry names are normalized like any
    /// other path, so `Primitives/LOD0/3001.g` in the zip is served as
    /// `/Primitives/LOD0/3001.g`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not a valid zip archive or an entry
    /// cannot be decompressed.
    pub fn from_zip_reader<R: Read + Seek>(reader: R) -> ArchiveResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut store = Self::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut bytes = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
            file.read_to_end(&mut bytes)?;
            store.insert(&name, bytes)?;
        }

        debug!("Loaded {} entries from zip archive", store.len());
        Ok(store)
    }

    /// Open a zip file on disk and load it with [`MemoryStore::from_zip_reader`].
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ArchiveNotFound`] if the file does not exist,
    /// or any error from [`MemoryStore::from_zip_reader`].
    pub fn open_zip<P: AsRef<Path>>(path: P) -> ArchiveResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArchiveError::ArchiveNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ArchiveError::Io(e)
            }
        })?;
        Self::from_zip_reader(BufReader::new(file))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the normalized entry paths, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl KeyedStore for MemoryStore {
    fn read_entry(&self, path: &str) -> ArchiveResult<Vec<u8>> {
        let key = normalize_path(path)?;
        self.entries
            .get(&key)
            .cloned()
            .ok_or(ArchiveError::EntryNotFound { path: key })
    }

    fn has_entry(&self, path: &str) -> bool {
        normalize_path(path).is_ok_and(|key| self.entries.contains_key(&key))
    }
}

// =============================================================================
// DirectoryStore
// =============================================================================

/// A store backed by an extracted archive directory.
///
/// Entry `/Primitives/LOD0/3001.g` is read from
/// `<root>/Primitives/LOD0/3001.g`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Create a store rooted at an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ArchiveNotFound`] if `root` is not a directory.
    pub fn open<P: AsRef<Path>>(root: P) -> ArchiveResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ArchiveError::ArchiveNotFound {
                path: root.to_path_buf(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The directory this store reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> ArchiveResult<(String, PathBuf)> {
        let key = normalize_path(path)?;
        let mut full = self.root.clone();
        full.extend(key.split('/'));
        Ok((key, full))
    }
}

impl KeyedStore for DirectoryStore {
    fn read_entry(&self, path: &str) -> ArchiveResult<Vec<u8>> {
        let (key, full) = self.resolve(path)?;
        if !full.is_file() {
            return Err(ArchiveError::EntryNotFound { path: key });
        }
        std::fs::read(&full).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArchiveError::EntryNotFound { path: key }
            } else {
                ArchiveError::Io(e)
            }
        })
    }

    fn has_entry(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|(_, full)| full.is_file())
    }
}
