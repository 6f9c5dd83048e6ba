//! picobench Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that are implemented by
//! chip-specific HALs and by the storage drivers. Application logic in
//! `picobench-core` is written against these traits only, so it can be
//! exercised on the host with mocks.
//!
//! Layering, top to bottom: `picobench-firmware` wires peripherals,
//! `picobench-core` and `picobench-drivers` hold the logic, this crate
//! names the seams, and `picobench-hal-rp2040` fills them for the RP2040.
//!
//! - [`gpio::OutputPin`]: digital output
//! - [`block::BlockDevice`]: byte-addressed storage with erase geometry
//! - [`spi::SpiConfig`]: bus settings shared by drivers and HALs

#![no_std]
#![deny(unsafe_code)]

pub mod block;
pub mod gpio;
pub mod spi;

pub use block::BlockDevice;
pub use gpio::OutputPin;
pub use spi::SpiConfig;
