//! Board-agnostic logic for the picobench example programs
//!
//! Everything here runs on the host as well as on the RP2040:
//!
//! - Board pin profiles and the RP2040 pin function tables
//! - LED blink controller
//! - Storage bring-up state machine and fault reporting
//! - Storage traits shared with the drivers
//! - Interactive storage console
//! - Firmware configuration parsing
//! - SD card round trip

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod blink;
pub mod board;
pub mod bringup;
pub mod config;
pub mod console;
pub mod demo;
pub mod storage;

#[cfg(test)]
mod testing;
