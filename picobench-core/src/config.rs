//! Firmware configuration
//!
//! `board.toml` is validated by the firmware build script and its values
//! are baked into the binary as strings. They are parsed here at startup.
//! An unusable value falls back to its default and is reported back to
//! the caller so the firmware can log it.

use core::fmt;

use heapless::Vec;

use crate::board::Board;

/// Console UART baud rate when none is configured
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// SPI clock for the flash chip when none is configured
pub const DEFAULT_FLASH_SPI_HZ: u32 = 4_000_000;

/// Accepted console baud rates
pub const BAUD_RATE_RANGE: core::ops::RangeInclusive<u32> = 1_200..=921_600;

/// Accepted flash SPI clocks
pub const FLASH_SPI_HZ_RANGE: core::ops::RangeInclusive<u32> = 100_000..=50_000_000;

/// A configuration value that was replaced by its default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    UnknownBoard,
    InvalidBaudRate,
    InvalidSpiFrequency,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownBoard => f.write_str("unknown board name"),
            ConfigError::InvalidBaudRate => f.write_str("baud rate out of range"),
            ConfigError::InvalidSpiFrequency => f.write_str("flash SPI frequency out of range"),
        }
    }
}

/// Values parsed from `board.toml`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareConfig {
    pub board: Board,
    pub console_baud_rate: u32,
    pub flash_spi_hz: u32,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            board: Board::default(),
            console_baud_rate: DEFAULT_BAUD_RATE,
            flash_spi_hz: DEFAULT_FLASH_SPI_HZ,
        }
    }
}

/// Values that fell back to their defaults
pub type Fallbacks = Vec<ConfigError, 3>;

fn parse_in_range(raw: &str, range: &core::ops::RangeInclusive<u32>) -> Option<u32> {
    // TOML allows `_` between digits
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in raw.trim().chars().filter(|&c| c != '_') {
        digits.push(c).ok()?;
    }
    digits.parse::<u32>().ok().filter(|v| range.contains(v))
}

impl FirmwareConfig {
    /// Parse raw values, substituting defaults for anything unusable
    pub fn parse(board: &str, baud_rate: &str, flash_spi_hz: &str) -> (Self, Fallbacks) {
        let mut config = Self::default();
        let mut fallbacks = Fallbacks::new();

        match Board::from_name(board) {
            Some(b) => config.board = b,
            None => {
                let _ = fallbacks.push(ConfigError::UnknownBoard);
            }
        }

        match parse_in_range(baud_rate, &BAUD_RATE_RANGE) {
            Some(v) => config.console_baud_rate = v,
            None => {
                let _ = fallbacks.push(ConfigError::InvalidBaudRate);
            }
        }

        match parse_in_range(flash_spi_hz, &FLASH_SPI_HZ_RANGE) {
            Some(v) => config.flash_spi_hz = v,
            None => {
                let _ = fallbacks.push(ConfigError::InvalidSpiFrequency);
            }
        }

        (config, fallbacks)
    }
}
