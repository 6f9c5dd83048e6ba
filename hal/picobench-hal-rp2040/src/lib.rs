//! RP2040-specific HAL for the picobench programs
//!
//! This crate provides RP2040 implementations of the `picobench-hal`
//! traits, plus the glue the binaries need to turn a board profile into
//! live peripherals:
//!
//! - GPIO outputs (implements `picobench_hal::OutputPin`)
//! - Pin bank for taking GPIOs by number
//! - SPI bus wrapper that hides which SPI instance a board uses
//! - UART console configuration
//! - Internal temperature sensor conversion

#![no_std]

pub mod adc;
pub mod gpio;
pub mod pins;
pub mod spi;
pub mod uart;

pub use gpio::GpioOutput;
pub use pins::{PinBank, PinError};
pub use spi::BoardSpi;
