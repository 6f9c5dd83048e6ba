//! SPI NOR flash
//!
//! `SpiFlash` speaks the common 25-series command set and identifies the
//! chip from its JEDEC ID. `FlashBlockDevice` presents any NOR flash as
//! the 512-byte blocks the FAT layer expects.

pub mod blocks;
pub mod commands;
pub mod devices;
pub mod spi_flash;

pub use blocks::FlashBlockDevice;
pub use devices::{DeviceAttributes, Identifier, JedecId};
pub use spi_flash::{DeviceConfig, FlashError, SpiFlash};
