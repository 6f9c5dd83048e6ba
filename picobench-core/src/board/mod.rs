//! Board pin profiles
//!
//! A profile is the flat set of hardware identifiers one program needs:
//! which SPI instance drives the storage device, the four SPI pins, the
//! status LED and the console UART. Profiles are plain values; the
//! firmware picks one at startup and passes it by reference.

pub mod mux;

use core::fmt;

pub use mux::{SpiBus, UartBus};
use mux::{spi_function, uart_function, SpiSignal, UartSignal, GPIO_COUNT};

/// Console UART wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsolePins {
    pub uart: UartBus,
    pub tx: u8,
    pub rx: u8,
}

/// Pin assignment for one board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardProfile {
    /// SPI instance wired to the storage device
    pub spi: SpiBus,
    /// SPI clock
    pub sck: u8,
    /// Controller out, peripheral in
    pub mosi: u8,
    /// Controller in, peripheral out
    pub miso: u8,
    /// Chip select, driven as a plain GPIO
    pub cs: u8,
    /// Status LED
    pub led: u8,
    /// Debug console
    pub console: ConsolePins,
}

/// Reasons a profile cannot be wired on an RP2040
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileError {
    /// GPIO number beyond the last user pin
    InvalidPin(u8),
    /// Pin cannot carry the SPI signal it was assigned
    NotSpiSignal(u8),
    /// Pin cannot carry the UART signal it was assigned
    NotUartSignal(u8),
    /// Same GPIO assigned to two roles
    Conflict(u8),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(pin) => write!(f, "GPIO{} does not exist", pin),
            Self::NotSpiSignal(pin) => write!(f, "GPIO{} cannot carry that SPI signal", pin),
            Self::NotUartSignal(pin) => write!(f, "GPIO{} cannot carry that UART signal", pin),
            Self::Conflict(pin) => write!(f, "GPIO{} is assigned twice", pin),
        }
    }
}

impl BoardProfile {
    /// All pins in the profile, in role order
    pub fn pins(&self) -> [u8; 7] {
        [
            self.sck,
            self.mosi,
            self.miso,
            self.cs,
            self.led,
            self.console.tx,
            self.console.rx,
        ]
    }

    /// Check the profile against the RP2040 pin function tables
    pub fn validate(&self) -> Result<(), ProfileError> {
        let pins = self.pins();
        for (i, &pin) in pins.iter().enumerate() {
            if pin >= GPIO_COUNT {
                return Err(ProfileError::InvalidPin(pin));
            }
            if pins[..i].contains(&pin) {
                return Err(ProfileError::Conflict(pin));
            }
        }

        for (pin, signal) in [
            (self.sck, SpiSignal::Sck),
            (self.mosi, SpiSignal::Tx),
            (self.miso, SpiSignal::Rx),
        ] {
            if spi_function(pin) != Some((self.spi, signal)) {
                return Err(ProfileError::NotSpiSignal(pin));
            }
        }

        for (pin, signal) in [
            (self.console.tx, UartSignal::Tx),
            (self.console.rx, UartSignal::Rx),
        ] {
            if uart_function(pin) != Some((self.console.uart, signal)) {
                return Err(ProfileError::NotUartSignal(pin));
            }
        }

        Ok(())
    }
}

/// A board the firmware knows how to wire
pub trait BoardDefinition {
    /// Name used in `board.toml`
    const NAME: &'static str;

    /// Pin profile for this board
    fn profile() -> BoardProfile;
}

/// Raspberry Pi Pico with storage on SPI1
pub struct Pico;

impl BoardDefinition for Pico {
    const NAME: &'static str = "pico";

    fn profile() -> BoardProfile {
        BoardProfile {
            spi: SpiBus::Spi1,
            sck: 10,
            mosi: 11,
            miso: 12,
            cs: 15,
            led: 25,
            console: ConsolePins {
                uart: UartBus::Uart0,
                tx: 0,
                rx: 1,
            },
        }
    }
}

/// Adafruit Feather RP2040 with storage on the header SPI0 pins
pub struct FeatherRp2040;

impl BoardDefinition for FeatherRp2040 {
    const NAME: &'static str = "feather-rp2040";

    fn profile() -> BoardProfile {
        BoardProfile {
            spi: SpiBus::Spi0,
            sck: 18,
            mosi: 19,
            miso: 20,
            cs: 10,
            led: 13,
            console: ConsolePins {
                uart: UartBus::Uart0,
                tx: 0,
                rx: 1,
            },
        }
    }
}

/// Supported boards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Board {
    #[default]
    Pico,
    FeatherRp2040,
}

impl Board {
    /// Every supported board
    pub const ALL: [Board; 2] = [Board::Pico, Board::FeatherRp2040];

    /// Look a board up by its `board.toml` name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name.trim())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Board::Pico => Pico::NAME,
            Board::FeatherRp2040 => FeatherRp2040::NAME,
        }
    }

    pub fn profile(&self) -> BoardProfile {
        match self {
            Board::Pico => Pico::profile(),
            Board::FeatherRp2040 => FeatherRp2040::profile(),
        }
    }
}
