//! SPI bus settings
//!
//! Storage drivers describe the bus they want here; the chip HAL turns it
//! into a peripheral config. Both SD cards and SPI NOR flash talk mode 0,
//! so the usual change between devices is only the clock.

/// Clock idle level and sampling edge, numbered as in datasheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    #[default]
    Mode0,
    Mode1,
    Mode2,
    Mode3,
}

impl SpiMode {
    /// Clock idles high
    pub const fn cpol(self) -> bool {
        matches!(self, SpiMode::Mode2 | SpiMode::Mode3)
    }

    /// Data sampled on the second clock edge
    pub const fn cpha(self) -> bool {
        matches!(self, SpiMode::Mode1 | SpiMode::Mode3)
    }
}

/// Bus clock and mode for one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    pub frequency: u32,
    pub mode: SpiMode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000_000,
            mode: SpiMode::Mode0,
        }
    }
}

impl SpiConfig {
    /// SD cards must be initialized at 100-400 kHz
    pub const SD_INIT: Self = Self {
        frequency: 400_000,
        mode: SpiMode::Mode0,
    };

    pub const fn with_frequency(self, frequency: u32) -> Self {
        Self { frequency, ..self }
    }

    pub const fn with_mode(self, mode: SpiMode) -> Self {
        Self { mode, ..self }
    }

    /// Clamp the clock to a device ceiling
    pub fn limited_to(self, max_frequency: u32) -> Self {
        self.with_frequency(self.frequency.min(max_frequency))
    }
}
