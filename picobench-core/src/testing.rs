//! Host-side doubles for unit tests

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::string::String as StdString;
use std::vec::Vec as StdVec;

use core::convert::Infallible;
use core::fmt;

use embedded_hal_async::delay::DelayNs;
use picobench_hal::block::{BlockDevice, Geometry};

use crate::storage::{DirEntryInfo, DirListing, Filesystem, WriteMode};

/// Delay that only accumulates the requested time
#[derive(Debug, Default)]
pub struct MockDelay {
    pub elapsed_ms: u64,
    pub calls: usize,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ms += u64::from(ns) / 1_000_000;
        self.calls += 1;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += u64::from(ms);
        self.calls += 1;
    }
}

/// Scripted input and captured output for a byte transport
#[derive(Debug, Default)]
pub struct Transcript {
    input: VecDeque<u8>,
    pub output: StdVec<u8>,
}

impl Transcript {
    pub fn with_input(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            output: StdVec::new(),
        }
    }

    pub fn output_str(&self) -> StdString {
        StdString::from_utf8_lossy(&self.output).into_owned()
    }
}

impl embedded_io_async::ErrorType for Transcript {
    type Error = Infallible;
}

impl embedded_io_async::Read for Transcript {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.input.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl embedded_io_async::Write for Transcript {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Errors from `MemFs`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemFsError {
    NotMounted,
    NotFound,
    Exists,
}

impl fmt::Display for MemFsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemFsError::NotMounted => f.write_str("no volume mounted"),
            MemFsError::NotFound => f.write_str("not found"),
            MemFsError::Exists => f.write_str("already exists"),
        }
    }
}

/// In-memory filesystem keyed by upper-cased absolute path
#[derive(Debug, Default)]
pub struct MemFs {
    pub files: BTreeMap<StdString, StdVec<u8>>,
    pub dirs: BTreeSet<StdString>,
    pub mounted: bool,
    pub fail_mount: bool,
}

fn normalize(path: &str) -> StdString {
    let mut out = StdString::from("/");
    out.push_str(&path.trim_matches('/').to_ascii_uppercase());
    out
}

fn parent_of(path: &str) -> StdString {
    match path.rfind('/') {
        Some(0) | None => StdString::from("/"),
        Some(i) => StdString::from(&path[..i]),
    }
}

impl MemFs {
    fn check(&self) -> Result<(), MemFsError> {
        if self.mounted {
            Ok(())
        } else {
            Err(MemFsError::NotMounted)
        }
    }

    fn dir_exists(&self, dir: &str) -> bool {
        dir == "/" || self.dirs.contains(dir)
    }
}

impl Filesystem for MemFs {
    type Error = MemFsError;

    fn mount(&mut self) -> Result<(), MemFsError> {
        if self.fail_mount {
            return Err(MemFsError::NotFound);
        }
        self.mounted = true;
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), MemFsError> {
        self.check()?;
        self.mounted = false;
        Ok(())
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn list_dir(&mut self, path: &str) -> Result<DirListing, MemFsError> {
        self.check()?;
        let dir = normalize(path);
        if !self.dir_exists(&dir) {
            return Err(MemFsError::NotFound);
        }
        let mut listing = DirListing::default();
        let children = self
            .dirs
            .iter()
            .map(|d| (d, 0u32, true))
            .chain(self.files.iter().map(|(f, data)| (f, data.len() as u32, false)));
        for (path, size, is_dir) in children {
            if parent_of(path) == dir {
                let name = &path[path.rfind('/').map_or(0, |i| i + 1)..];
                listing.push(DirEntryInfo {
                    name: heapless::String::try_from(name).map_err(|_| MemFsError::NotFound)?,
                    size,
                    is_dir,
                });
            }
        }
        Ok(listing)
    }

    fn make_dir(&mut self, path: &str) -> Result<(), MemFsError> {
        self.check()?;
        let dir = normalize(path);
        if self.dir_exists(&dir) || self.files.contains_key(&dir) {
            return Err(MemFsError::Exists);
        }
        if !self.dir_exists(&parent_of(&dir)) {
            return Err(MemFsError::NotFound);
        }
        self.dirs.insert(dir);
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), MemFsError> {
        self.check()?;
        self.files
            .remove(&normalize(path))
            .map(|_| ())
            .ok_or(MemFsError::NotFound)
    }

    fn read_at(&mut self, path: &str, offset: u32, buf: &mut [u8]) -> Result<usize, MemFsError> {
        self.check()?;
        let data = self.files.get(&normalize(path)).ok_or(MemFsError::NotFound)?;
        let start = (offset as usize).min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        Ok(n)
    }

    fn write(&mut self, path: &str, data: &[u8], mode: WriteMode) -> Result<usize, MemFsError> {
        self.check()?;
        let file = normalize(path);
        if !self.dir_exists(&parent_of(&file)) {
            return Err(MemFsError::NotFound);
        }
        let contents = self.files.entry(file).or_default();
        if mode == WriteMode::Truncate {
            contents.clear();
        }
        contents.extend_from_slice(data);
        Ok(data.len())
    }

    fn file_size(&mut self, path: &str) -> Result<u32, MemFsError> {
        self.check()?;
        self.files
            .get(&normalize(path))
            .map(|d| d.len() as u32)
            .ok_or(MemFsError::NotFound)
    }
}

/// Byte-addressed RAM disk with NOR-like erase geometry
#[derive(Debug)]
pub struct RamDisk {
    pub data: StdVec<u8>,
    pub erase_block_size: u32,
}

impl RamDisk {
    pub fn new(size: usize) -> Self {
        Self {
            data: (0..size).map(|i| i as u8).collect(),
            erase_block_size: 4096,
        }
    }
}

impl BlockDevice for RamDisk {
    type Error = Infallible;

    fn read_at(&mut self, buf: &mut [u8], offset: u32) -> Result<usize, Infallible> {
        let start = (offset as usize).min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn erase_blocks(&mut self, start: u32, count: u32) -> Result<(), Infallible> {
        let from = (start * self.erase_block_size) as usize;
        let to = from + (count * self.erase_block_size) as usize;
        self.data[from..to].fill(0xFF);
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        Geometry {
            size: self.data.len() as u32,
            write_block_size: 256,
            erase_block_size: self.erase_block_size,
        }
    }
}
