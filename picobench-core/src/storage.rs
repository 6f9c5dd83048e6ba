//! Storage traits shared by the drivers and the console
//!
//! `Configure` is the two-phase setup every storage layer goes through:
//! construct with wiring, then configure with options that may be
//! rejected. `Filesystem` is the file-level surface the console and the
//! SD-card demo run against.

use core::fmt;

use heapless::{String, Vec};

/// Sector size the FAT layer works in
pub const SECTOR_SIZE: usize = 512;

/// Longest 8.3 name including the dot
pub const MAX_NAME_LEN: usize = 12;

/// Most directory entries returned by one listing
pub const MAX_DIR_ENTRIES: usize = 32;

/// Post-construction configuration step
pub trait Configure {
    /// Options accepted by `configure`
    type Config: Default;
    /// Why the options were rejected
    type Error: fmt::Display;

    fn configure(&mut self, config: &Self::Config) -> Result<(), Self::Error>;
}

/// Filesystem options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FsConfig {
    /// Bytes per sector; must equal the FAT library's block size
    pub sector_size: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            sector_size: SECTOR_SIZE,
        }
    }
}

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String<MAX_NAME_LEN>,
    pub size: u32,
    pub is_dir: bool,
}

/// Result of listing a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    pub entries: Vec<DirEntryInfo, MAX_DIR_ENTRIES>,
    /// More entries existed than fit in `entries`
    pub truncated: bool,
}

impl DirListing {
    /// Append an entry, marking the listing truncated once full
    pub fn push(&mut self, entry: DirEntryInfo) {
        if self.entries.push(entry).is_err() {
            self.truncated = true;
        }
    }
}

/// How `Filesystem::write` treats an existing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteMode {
    /// Create the file, or discard its contents
    Truncate,
    /// Create the file, or add to its end
    Append,
}

/// File-level access to a mounted volume
///
/// Paths are `/`-separated and absolute; a leading `/` is optional.
pub trait Filesystem {
    type Error: fmt::Display;

    fn mount(&mut self) -> Result<(), Self::Error>;

    fn unmount(&mut self) -> Result<(), Self::Error>;

    fn is_mounted(&self) -> bool;

    fn list_dir(&mut self, path: &str) -> Result<DirListing, Self::Error>;

    fn make_dir(&mut self, path: &str) -> Result<(), Self::Error>;

    /// Delete a file
    fn remove(&mut self, path: &str) -> Result<(), Self::Error>;

    /// Read from `offset` into `buf`, returning the bytes read
    ///
    /// Returns 0 at or past the end of the file.
    fn read_at(&mut self, path: &str, offset: u32, buf: &mut [u8]) -> Result<usize, Self::Error>;

    fn write(&mut self, path: &str, data: &[u8], mode: WriteMode) -> Result<usize, Self::Error>;

    fn file_size(&mut self, path: &str) -> Result<u32, Self::Error>;
}

/// Split an absolute path into its parent components and final name
///
/// `"/A/B/C.TXT"` gives an iterator over `["A", "B"]` and `"C.TXT"`.
/// Returns `None` for the root itself.
pub fn split_path(path: &str) -> Option<(impl Iterator<Item = &str>, &str)> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let (parent, name) = match trimmed.rfind('/') {
        Some(i) => (&trimmed[..i], &trimmed[i + 1..]),
        None => ("", trimmed),
    };
    Some((parent.split('/').filter(|c| !c.is_empty()), name))
}

/// Components of a directory path, root giving none
pub fn dir_components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|c| !c.is_empty())
}
