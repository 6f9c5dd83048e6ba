//! Shared startup code for the picobench binaries
//!
//! - `settings`: board.toml values baked in by the build script
//! - `wiring`: turns the selected board profile into live peripherals

#![no_std]

pub mod settings;
pub mod wiring;
