//! Firmware settings
//!
//! The build script validates board.toml and exports its values as
//! environment variables. They are parsed here at startup; anything
//! unusable falls back to its default with a warning.

use defmt::*;
use picobench_core::config::FirmwareConfig;

const BOARD: &str = env!("PICOBENCH_BOARD");
const BAUD_RATE: &str = env!("PICOBENCH_BAUD_RATE");
const FLASH_SPI_HZ: &str = env!("PICOBENCH_FLASH_SPI_HZ");

/// Load the baked-in settings
pub fn load() -> FirmwareConfig {
    let (config, fallbacks) = FirmwareConfig::parse(BOARD, BAUD_RATE, FLASH_SPI_HZ);

    for fallback in &fallbacks {
        warn!("board.toml: {}, using default", fallback);
    }

    info!(
        "Board '{}', console {} baud, flash SPI {} Hz",
        config.board.name(),
        config.console_baud_rate,
        config.flash_spi_hz
    );
    config
}
