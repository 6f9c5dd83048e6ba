//! Board wiring
//!
//! Embassy wants SPI and UART pins with their concrete types, so each board
//! has a match arm that takes them from `Peripherals` directly. The chip
//! select and LED are plain GPIOs; they go through a `PinBank` and are
//! taken by the numbers in the board profile, which keeps the arm and the
//! profile honest with each other.

use embassy_rp::peripherals::{ADC, ADC_TEMP_SENSOR, PIN_0, PIN_1, UART0};
use embassy_rp::{Peri, Peripherals};
use picobench_core::board::{Board, BoardProfile, ConsolePins, ProfileError, UartBus};
use picobench_hal::SpiConfig;
use picobench_hal_rp2040::{spi, stock_pins, BoardSpi, GpioOutput, PinBank, PinError};

/// Why a board could not be wired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WiringError {
    Profile(ProfileError),
    Pin(PinError),
    /// Console is not on UART0 GPIO0/GPIO1
    ConsolePins,
}

impl From<ProfileError> for WiringError {
    fn from(e: ProfileError) -> Self {
        WiringError::Profile(e)
    }
}

impl From<PinError> for WiringError {
    fn from(e: PinError) -> Self {
        WiringError::Pin(e)
    }
}

/// Console UART peripheral and pins, not yet configured
pub struct ConsoleUart {
    pub uart: Peri<'static, UART0>,
    pub tx: Peri<'static, PIN_0>,
    pub rx: Peri<'static, PIN_1>,
}

/// Everything the storage programs need
pub struct Wiring {
    pub profile: BoardProfile,
    pub spi: BoardSpi,
    pub cs: GpioOutput<'static>,
    pub led: GpioOutput<'static>,
    pub console: ConsoleUart,
    pub adc: Peri<'static, ADC>,
    pub temp_sensor: Peri<'static, ADC_TEMP_SENSOR>,
}

const CONSOLE: ConsolePins = ConsolePins {
    uart: UartBus::Uart0,
    tx: 0,
    rx: 1,
};

/// Only the status LED, for `blinky`
pub fn status_led(board: Board, p: Peripherals) -> Result<GpioOutput<'static>, WiringError> {
    let profile = board.profile();
    profile.validate()?;

    let mut bank = PinBank::empty();
    match board {
        Board::Pico => {
            stock_pins!(bank, p, [25]);
        }
        Board::FeatherRp2040 => {
            stock_pins!(bank, p, [13]);
        }
    }
    Ok(GpioOutput::new(bank.take(profile.led)?, false))
}

/// Storage bus, chip select, LED, console and temperature sensor
///
/// The SPI bus starts at `spi_config`; the chip select starts deasserted.
pub fn wire(board: Board, p: Peripherals, spi_config: &SpiConfig) -> Result<Wiring, WiringError> {
    let profile = board.profile();
    profile.validate()?;
    if profile.console != CONSOLE {
        return Err(WiringError::ConsolePins);
    }

    let mut bank = PinBank::empty();
    let bus: BoardSpi = match board {
        Board::Pico => {
            stock_pins!(bank, p, [15, 25]);
            spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, spi_config).into()
        }
        Board::FeatherRp2040 => {
            stock_pins!(bank, p, [10, 13]);
            spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_20, spi_config).into()
        }
    };

    Ok(Wiring {
        profile,
        spi: bus,
        cs: GpioOutput::new(bank.take(profile.cs)?, true),
        led: GpioOutput::new(bank.take(profile.led)?, false),
        console: ConsoleUart {
            uart: p.UART0,
            tx: p.PIN_0,
            rx: p.PIN_1,
        },
        adc: p.ADC,
        temp_sensor: p.ADC_TEMP_SENSOR,
    })
}
