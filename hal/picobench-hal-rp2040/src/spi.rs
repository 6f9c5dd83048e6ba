//! SPI bus setup
//!
//! Boards put their storage on different SPI instances, and embassy's
//! `Spi` type is generic over the instance. `BoardSpi` erases that so the
//! drivers see one `embedded_hal::spi::SpiBus` type whatever the board.

use embassy_rp::peripherals::{SPI0, SPI1};
use embassy_rp::spi::{self, Blocking, ClkPin, Instance, MisoPin, MosiPin, Spi};
use embassy_rp::Peri;
use embedded_hal::spi::{ErrorType, SpiBus};
use picobench_hal::SpiConfig;

/// Convert a chip-agnostic SPI config to embassy's
pub fn embassy_config(config: &SpiConfig) -> spi::Config {
    let mut out = spi::Config::default();
    out.frequency = config.frequency;
    out.polarity = if config.mode.cpol() {
        spi::Polarity::IdleHigh
    } else {
        spi::Polarity::IdleLow
    };
    out.phase = if config.mode.cpha() {
        spi::Phase::CaptureOnSecondTransition
    } else {
        spi::Phase::CaptureOnFirstTransition
    };
    out
}

/// Blocking SPI on whichever instance the board uses
pub enum BoardSpi {
    Spi0(Spi<'static, SPI0, Blocking>),
    Spi1(Spi<'static, SPI1, Blocking>),
}

/// Build a blocking SPI bus on instance `T`
pub fn new_blocking<T: Instance>(
    inner: Peri<'static, T>,
    clk: Peri<'static, impl ClkPin<T>>,
    mosi: Peri<'static, impl MosiPin<T>>,
    miso: Peri<'static, impl MisoPin<T>>,
    config: &SpiConfig,
) -> Spi<'static, T, Blocking> {
    Spi::new_blocking(inner, clk, mosi, miso, embassy_config(config))
}

impl From<Spi<'static, SPI0, Blocking>> for BoardSpi {
    fn from(spi: Spi<'static, SPI0, Blocking>) -> Self {
        BoardSpi::Spi0(spi)
    }
}

impl From<Spi<'static, SPI1, Blocking>> for BoardSpi {
    fn from(spi: Spi<'static, SPI1, Blocking>) -> Self {
        BoardSpi::Spi1(spi)
    }
}

impl BoardSpi {
    /// Change the clock rate, e.g. after SD card initialization
    pub fn set_frequency(&mut self, frequency: u32) {
        match self {
            BoardSpi::Spi0(spi) => spi.set_frequency(frequency),
            BoardSpi::Spi1(spi) => spi.set_frequency(frequency),
        }
    }
}

impl ErrorType for BoardSpi {
    type Error = spi::Error;
}

impl SpiBus<u8> for BoardSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        match self {
            BoardSpi::Spi0(spi) => SpiBus::read(spi, words),
            BoardSpi::Spi1(spi) => SpiBus::read(spi, words),
        }
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        match self {
            BoardSpi::Spi0(spi) => SpiBus::write(spi, words),
            BoardSpi::Spi1(spi) => SpiBus::write(spi, words),
        }
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        match self {
            BoardSpi::Spi0(spi) => SpiBus::transfer(spi, read, write),
            BoardSpi::Spi1(spi) => SpiBus::transfer(spi, read, write),
        }
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        match self {
            BoardSpi::Spi0(spi) => SpiBus::transfer_in_place(spi, words),
            BoardSpi::Spi1(spi) => SpiBus::transfer_in_place(spi, words),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        match self {
            BoardSpi::Spi0(spi) => SpiBus::flush(spi),
            BoardSpi::Spi1(spi) => SpiBus::flush(spi),
        }
    }
}
