//! Storage driver implementations
//!
//! This crate provides concrete implementations of the storage traits
//! defined in `picobench-core` and `picobench-hal`:
//!
//! - Chip-select SPI device over a shared bus
//! - SPI NOR flash with JEDEC identification
//! - 512-byte block view of NOR flash for the FAT layer
//! - FAT filesystem adapter over `embedded-sdmmc`

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod fat;
pub mod flash;
pub mod spi;

pub use fat::{FatError, FatFs, FixedTimeSource};
pub use flash::{DeviceConfig, FlashBlockDevice, FlashError, Identifier, SpiFlash};
pub use spi::ChipSelectDevice;
