//! FAT filesystem adapter over `embedded-sdmmc`
//!
//! Wraps a `VolumeManager` and exposes the path-based `Filesystem` trait.
//! Only volume 0 is used. Directory and file handles are opened per call
//! and closed before returning, so nothing stays open between commands.

use core::fmt::{self, Debug, Write as _};

use embedded_sdmmc::{
    Block, BlockDevice, Mode, RawDirectory, RawVolume, TimeSource, Timestamp, VolumeIdx,
    VolumeManager,
};
use heapless::String;
use picobench_core::storage::{
    dir_components, split_path, Configure, DirEntryInfo, DirListing, Filesystem, FsConfig,
    WriteMode,
};

type Manager<D, T> = VolumeManager<D, T, 4, 4, 1>;
type SdmmcError<E> = embedded_sdmmc::Error<E>;

#[derive(Debug)]
pub enum FatError<E: Debug> {
    NotConfigured,
    NotMounted,
    /// Requested sector size differs from the FAT block size
    SectorSize(usize),
    /// Empty path, or the root where a file was expected
    InvalidPath,
    Fs(SdmmcError<E>),
}

impl<E: Debug> From<SdmmcError<E>> for FatError<E> {
    fn from(e: SdmmcError<E>) -> Self {
        FatError::Fs(e)
    }
}

impl<E: Debug> fmt::Display for FatError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatError::NotConfigured => write!(f, "filesystem not configured"),
            FatError::NotMounted => write!(f, "no volume mounted"),
            FatError::SectorSize(size) => {
                write!(f, "sector size {} unsupported, expected {}", size, Block::LEN)
            }
            FatError::InvalidPath => write!(f, "invalid path"),
            FatError::Fs(SdmmcError::NotFound) => write!(f, "not found"),
            FatError::Fs(SdmmcError::FileAlreadyExists | SdmmcError::DirAlreadyExists) => {
                write!(f, "already exists")
            }
            FatError::Fs(SdmmcError::DeviceError(e)) => write!(f, "device error: {:?}", e),
            FatError::Fs(e) => write!(f, "{:?}", e),
        }
    }
}

/// Time source that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub Timestamp);

impl FixedTimeSource {
    /// 1970-01-01 00:00:00, for boards without a clock
    pub const fn epoch() -> Self {
        Self(Timestamp {
            year_since_1970: 0,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        })
    }
}

impl Default for FixedTimeSource {
    fn default() -> Self {
        Self::epoch()
    }
}

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        self.0
    }
}

/// FAT volume on a block device
pub struct FatFs<D: BlockDevice, T: TimeSource> {
    manager: Manager<D, T>,
    volume: Option<RawVolume>,
    configured: bool,
}

impl<D, T> FatFs<D, T>
where
    D: BlockDevice,
    D::Error: Debug,
    T: TimeSource,
{
    pub fn new(device: D, time_source: T) -> Self {
        Self {
            manager: VolumeManager::new(device, time_source),
            volume: None,
            configured: false,
        }
    }

    /// Open the directory at `components`, run `f` on it, then close it
    fn with_dir<'p, R>(
        &mut self,
        components: impl Iterator<Item = &'p str>,
        f: impl FnOnce(&mut Manager<D, T>, RawDirectory) -> Result<R, SdmmcError<D::Error>>,
    ) -> Result<R, FatError<D::Error>> {
        let volume = self.volume.ok_or(FatError::NotMounted)?;
        let manager = &mut self.manager;

        let mut dir = manager.open_root_dir(volume)?;
        for name in components {
            let child = manager.open_dir(dir, name);
            manager.close_dir(dir)?;
            dir = child?;
        }

        let result = f(manager, dir);
        manager.close_dir(dir)?;
        Ok(result?)
    }

    /// Run `f` on the directory holding the file at `path`
    fn with_parent<R>(
        &mut self,
        path: &str,
        f: impl FnOnce(&mut Manager<D, T>, RawDirectory, &str) -> Result<R, SdmmcError<D::Error>>,
    ) -> Result<R, FatError<D::Error>> {
        let (parents, name) = split_path(path).ok_or(FatError::InvalidPath)?;
        self.with_dir(parents, |manager, dir| f(manager, dir, name))
    }
}

fn read_from<D, T>(
    manager: &mut Manager<D, T>,
    dir: RawDirectory,
    name: &str,
    offset: u32,
    buf: &mut [u8],
) -> Result<usize, SdmmcError<D::Error>>
where
    D: BlockDevice,
    T: TimeSource,
{
    let file = manager.open_file_in_dir(dir, name, Mode::ReadOnly)?;
    let result = (|| -> Result<usize, SdmmcError<D::Error>> {
        if offset >= manager.file_length(file)? {
            return Ok(0);
        }
        manager.file_seek_from_start(file, offset)?;
        let mut total = 0;
        while total < buf.len() {
            let n = manager.read(file, &mut buf[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }
        Ok(total)
    })();
    manager.close_file(file)?;
    result
}

fn write_to<D, T>(
    manager: &mut Manager<D, T>,
    dir: RawDirectory,
    name: &str,
    data: &[u8],
    mode: WriteMode,
) -> Result<usize, SdmmcError<D::Error>>
where
    D: BlockDevice,
    T: TimeSource,
{
    let mode = match mode {
        WriteMode::Truncate => Mode::ReadWriteCreateOrTruncate,
        WriteMode::Append => Mode::ReadWriteCreateOrAppend,
    };
    let file = manager.open_file_in_dir(dir, name, mode)?;
    let result = manager.write(file, data);
    manager.close_file(file)?;
    result.map(|()| data.len())
}

impl<D, T> Configure for FatFs<D, T>
where
    D: BlockDevice,
    D::Error: Debug,
    T: TimeSource,
{
    type Config = FsConfig;
    type Error = FatError<D::Error>;

    fn configure(&mut self, config: &FsConfig) -> Result<(), Self::Error> {
        if config.sector_size != Block::LEN {
            return Err(FatError::SectorSize(config.sector_size));
        }
        self.configured = true;
        Ok(())
    }
}

impl<D, T> Filesystem for FatFs<D, T>
where
    D: BlockDevice,
    D::Error: Debug,
    T: TimeSource,
{
    type Error = FatError<D::Error>;

    fn mount(&mut self) -> Result<(), Self::Error> {
        if !self.configured {
            return Err(FatError::NotConfigured);
        }
        if self.volume.is_none() {
            self.volume = Some(self.manager.open_raw_volume(VolumeIdx(0))?);
        }
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), Self::Error> {
        let volume = self.volume.take().ok_or(FatError::NotMounted)?;
        if let Err(e) = self.manager.close_volume(volume) {
            self.volume = Some(volume);
            return Err(e.into());
        }
        Ok(())
    }

    fn is_mounted(&self) -> bool {
        self.volume.is_some()
    }

    fn list_dir(&mut self, path: &str) -> Result<DirListing, Self::Error> {
        self.with_dir(dir_components(path), |manager, dir| {
            let mut listing = DirListing::default();
            manager.iterate_dir(dir, |entry| {
                if entry.attributes.is_volume() {
                    return;
                }
                let mut name = String::new();
                let _ = write!(name, "{}", entry.name);
                if name == "." || name == ".." {
                    return;
                }
                listing.push(DirEntryInfo {
                    name,
                    size: entry.size,
                    is_dir: entry.attributes.is_directory(),
                });
            })?;
            Ok(listing)
        })
    }

    fn make_dir(&mut self, path: &str) -> Result<(), Self::Error> {
        self.with_parent(path, |manager, dir, name| {
            manager.make_dir_in_dir(dir, name)
        })
    }

    fn remove(&mut self, path: &str) -> Result<(), Self::Error> {
        self.with_parent(path, |manager, dir, name| {
            manager.delete_file_in_dir(dir, name)
        })
    }

    fn read_at(&mut self, path: &str, offset: u32, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.with_parent(path, |manager, dir, name| {
            read_from(manager, dir, name, offset, buf)
        })
    }

    fn write(&mut self, path: &str, data: &[u8], mode: WriteMode) -> Result<usize, Self::Error> {
        self.with_parent(path, |manager, dir, name| {
            write_to(manager, dir, name, data, mode)
        })
    }

    fn file_size(&mut self, path: &str) -> Result<u32, Self::Error> {
        self.with_parent(path, |manager, dir, name| {
            manager.find_directory_entry(dir, name).map(|e| e.size)
        })
    }
}
