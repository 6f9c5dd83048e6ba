//! 25-series SPI NOR flash driver
//!
//! The chip is identified from its JEDEC ID during `configure`; until then
//! every data operation fails with `NotConfigured`. Programs are split at
//! page boundaries and each program or erase waits for the busy bit to
//! clear before returning.

use core::fmt;

use embedded_hal::spi::{ErrorKind, Operation, SpiDevice};
use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};
use picobench_core::storage::Configure;

use super::commands::{
    self, PAGE_PROGRAM, PAGE_SIZE, READ_DATA, READ_JEDEC_ID, READ_STATUS, SECTOR_ERASE,
    SECTOR_SIZE, STATUS_BUSY, WRITE_ENABLE, WRITE_STATUS,
};
use super::devices::{DeviceAttributes, Identifier, JedecId};

/// Status reads before a busy chip is given up on
///
/// A 4 KiB erase is specified at up to 400 ms; at the slowest bus clock
/// one status read takes a few microseconds.
pub const BUSY_POLL_LIMIT: u32 = 1_000_000;

/// Options for `SpiFlash::configure`
#[derive(Clone, Copy, Default)]
pub struct DeviceConfig {
    pub identifier: Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// ID read back as all zeros or all ones
    NoResponse,
    UnknownDevice(JedecId),
    /// Data operation before a successful `configure`
    NotConfigured,
    Spi(ErrorKind),
    OutOfBounds,
    NotAligned,
    /// Busy bit never cleared
    Timeout,
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashError::NoResponse => write!(f, "no response from flash chip"),
            FlashError::UnknownDevice(id) => write!(f, "unknown flash device {}", id),
            FlashError::NotConfigured => write!(f, "flash not configured"),
            FlashError::Spi(kind) => write!(f, "SPI error: {}", kind),
            FlashError::OutOfBounds => write!(f, "address out of bounds"),
            FlashError::NotAligned => write!(f, "address not aligned"),
            FlashError::Timeout => write!(f, "flash busy timeout"),
        }
    }
}

impl NorFlashError for FlashError {
    fn kind(&self) -> NorFlashErrorKind {
        match self {
            FlashError::OutOfBounds => NorFlashErrorKind::OutOfBounds,
            FlashError::NotAligned => NorFlashErrorKind::NotAligned,
            _ => NorFlashErrorKind::Other,
        }
    }
}

fn spi_error<E: embedded_hal::spi::Error>(e: E) -> FlashError {
    FlashError::Spi(e.kind())
}

/// SPI NOR flash chip behind a `SpiDevice`
pub struct SpiFlash<SPI> {
    spi: SPI,
    attributes: Option<DeviceAttributes>,
}

impl<SPI: SpiDevice> SpiFlash<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self {
            spi,
            attributes: None,
        }
    }

    /// The identified part, once configured
    pub fn attributes(&self) -> Option<&DeviceAttributes> {
        self.attributes.as_ref()
    }

    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    pub fn release(self) -> SPI {
        self.spi
    }

    pub fn read_jedec_id(&mut self) -> Result<JedecId, FlashError> {
        let mut id = [0u8; 3];
        self.spi
            .transaction(&mut [Operation::Write(&[READ_JEDEC_ID]), Operation::Read(&mut id)])
            .map_err(spi_error)?;
        Ok(JedecId::from_bytes(id))
    }

    fn read_status(&mut self) -> Result<u8, FlashError> {
        let mut status = [0u8; 1];
        self.spi
            .transaction(&mut [Operation::Write(&[READ_STATUS]), Operation::Read(&mut status)])
            .map_err(spi_error)?;
        Ok(status[0])
    }

    fn wait_idle(&mut self) -> Result<(), FlashError> {
        for _ in 0..BUSY_POLL_LIMIT {
            if self.read_status()? & STATUS_BUSY == 0 {
                return Ok(());
            }
        }
        Err(FlashError::Timeout)
    }

    fn write_enable(&mut self) -> Result<(), FlashError> {
        self.spi.write(&[WRITE_ENABLE]).map_err(spi_error)
    }

    /// Clear the block protection bits
    fn unprotect(&mut self) -> Result<(), FlashError> {
        self.write_enable()?;
        self.spi.write(&[WRITE_STATUS, 0x00]).map_err(spi_error)?;
        self.wait_idle()
    }

    fn total_size(&self) -> Result<u32, FlashError> {
        self.attributes
            .map(|a| a.total_size)
            .ok_or(FlashError::NotConfigured)
    }

    fn check_range(&self, offset: u32, len: usize) -> Result<(), FlashError> {
        let total = self.total_size()?;
        let end = u32::try_from(len)
            .ok()
            .and_then(|len| offset.checked_add(len))
            .ok_or(FlashError::OutOfBounds)?;
        if end > total {
            return Err(FlashError::OutOfBounds);
        }
        Ok(())
    }
}

impl<SPI: SpiDevice> Configure for SpiFlash<SPI> {
    type Config = DeviceConfig;
    type Error = FlashError;

    fn configure(&mut self, config: &DeviceConfig) -> Result<(), FlashError> {
        self.attributes = None;

        let id = self.read_jedec_id()?;
        if id.is_blank() {
            return Err(FlashError::NoResponse);
        }
        let attributes = config
            .identifier
            .identify(id)
            .ok_or(FlashError::UnknownDevice(id))?;

        self.wait_idle()?;
        if attributes.has_sector_protection {
            self.unprotect()?;
        }

        self.attributes = Some(attributes);
        Ok(())
    }
}

impl<SPI: SpiDevice> ErrorType for SpiFlash<SPI> {
    type Error = FlashError;
}

impl<SPI: SpiDevice> ReadNorFlash for SpiFlash<SPI> {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), FlashError> {
        self.check_range(offset, bytes.len())?;
        self.spi
            .transaction(&mut [
                Operation::Write(&commands::with_address(READ_DATA, offset)),
                Operation::Read(bytes),
            ])
            .map_err(spi_error)
    }

    fn capacity(&self) -> usize {
        self.attributes.map_or(0, |a| a.total_size as usize)
    }
}

impl<SPI: SpiDevice> NorFlash for SpiFlash<SPI> {
    const WRITE_SIZE: usize = 1;
    const ERASE_SIZE: usize = SECTOR_SIZE as usize;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), FlashError> {
        let total = self.total_size()?;
        if from % SECTOR_SIZE != 0 || to % SECTOR_SIZE != 0 {
            return Err(FlashError::NotAligned);
        }
        if from > to || to > total {
            return Err(FlashError::OutOfBounds);
        }

        for address in (from..to).step_by(SECTOR_SIZE as usize) {
            self.write_enable()?;
            self.spi
                .write(&commands::with_address(SECTOR_ERASE, address))
                .map_err(spi_error)?;
            self.wait_idle()?;
        }
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), FlashError> {
        self.check_range(offset, bytes.len())?;

        let mut address = offset;
        let mut remaining = bytes;
        while !remaining.is_empty() {
            // Programs wrap within a page, so stop at the boundary
            let room = (PAGE_SIZE - address % PAGE_SIZE) as usize;
            let (chunk, rest) = remaining.split_at(room.min(remaining.len()));

            self.write_enable()?;
            self.spi
                .transaction(&mut [
                    Operation::Write(&commands::with_address(PAGE_PROGRAM, address)),
                    Operation::Write(chunk),
                ])
                .map_err(spi_error)?;
            self.wait_idle()?;

            address += chunk.len() as u32;
            remaining = rest;
        }
        Ok(())
    }
}
