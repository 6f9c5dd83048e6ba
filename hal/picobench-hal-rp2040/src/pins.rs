//! Taking GPIOs by number
//!
//! SPI and UART pins must be passed to embassy with their concrete types,
//! so the board wiring code takes those directly from `Peripherals`. Every
//! other pin a board exposes goes into a `PinBank`, from which the LED and
//! chip select are taken using the numbers in the board profile.

use embassy_rp::gpio::{AnyPin, Pin};
use embassy_rp::Peri;
use picobench_core::board::mux::GPIO_COUNT;

/// Drop a GPIO's concrete type
pub fn erase<T: Pin>(pin: Peri<'static, T>) -> Peri<'static, AnyPin> {
    pin.into()
}

/// `p.PIN_<n>` for a literal `n`, erased to `AnyPin`
///
/// ```ignore
/// let led = take_pin!(p, 25);
/// ```
#[macro_export]
macro_rules! take_pin {
    ($p:expr, 0) => { $crate::pins::erase($p.PIN_0) };
    ($p:expr, 1) => { $crate::pins::erase($p.PIN_1) };
    ($p:expr, 2) => { $crate::pins::erase($p.PIN_2) };
    ($p:expr, 3) => { $crate::pins::erase($p.PIN_3) };
    ($p:expr, 4) => { $crate::pins::erase($p.PIN_4) };
    ($p:expr, 5) => { $crate::pins::erase($p.PIN_5) };
    ($p:expr, 6) => { $crate::pins::erase($p.PIN_6) };
    ($p:expr, 7) => { $crate::pins::erase($p.PIN_7) };
    ($p:expr, 8) => { $crate::pins::erase($p.PIN_8) };
    ($p:expr, 9) => { $crate::pins::erase($p.PIN_9) };
    ($p:expr, 10) => { $crate::pins::erase($p.PIN_10) };
    ($p:expr, 11) => { $crate::pins::erase($p.PIN_11) };
    ($p:expr, 12) => { $crate::pins::erase($p.PIN_12) };
    ($p:expr, 13) => { $crate::pins::erase($p.PIN_13) };
    ($p:expr, 14) => { $crate::pins::erase($p.PIN_14) };
    ($p:expr, 15) => { $crate::pins::erase($p.PIN_15) };
    ($p:expr, 16) => { $crate::pins::erase($p.PIN_16) };
    ($p:expr, 17) => { $crate::pins::erase($p.PIN_17) };
    ($p:expr, 18) => { $crate::pins::erase($p.PIN_18) };
    ($p:expr, 19) => { $crate::pins::erase($p.PIN_19) };
    ($p:expr, 20) => { $crate::pins::erase($p.PIN_20) };
    ($p:expr, 21) => { $crate::pins::erase($p.PIN_21) };
    ($p:expr, 22) => { $crate::pins::erase($p.PIN_22) };
    ($p:expr, 23) => { $crate::pins::erase($p.PIN_23) };
    ($p:expr, 24) => { $crate::pins::erase($p.PIN_24) };
    ($p:expr, 25) => { $crate::pins::erase($p.PIN_25) };
    ($p:expr, 26) => { $crate::pins::erase($p.PIN_26) };
    ($p:expr, 27) => { $crate::pins::erase($p.PIN_27) };
    ($p:expr, 28) => { $crate::pins::erase($p.PIN_28) };
    ($p:expr, 29) => { $crate::pins::erase($p.PIN_29) };
}

/// Move several GPIOs into a `PinBank`
///
/// ```ignore
/// let mut bank = PinBank::empty();
/// stock_pins!(bank, p, [13, 15, 25]);
/// ```
#[macro_export]
macro_rules! stock_pins {
    ($bank:expr, $p:expr, [$($n:tt),* $(,)?]) => {
        $( $bank.insert($n, $crate::take_pin!($p, $n)); )*
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Not a GPIO on this chip
    NoSuchPin(u8),
    /// Pin was never stocked or was already taken
    Unavailable(u8),
}

/// GPIOs available for assignment by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

impl Default for PinBank {
    fn default() -> Self {
        Self::empty()
    }
}

impl PinBank {
    /// Create a bank holding no pins
    pub fn empty() -> Self {
        Self {
            pins: [const { None }; GPIO_COUNT as usize],
        }
    }

    /// Place a pin in the bank under its GPIO number
    ///
    /// Out-of-range numbers are ignored.
    pub fn insert(&mut self, pin_num: u8, pin: Peri<'static, AnyPin>) {
        if pin_num < GPIO_COUNT {
            self.pins[pin_num as usize] = Some(pin);
        }
    }

    /// Remove a pin by GPIO number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin_num >= GPIO_COUNT {
            return Err(PinError::NoSuchPin(pin_num));
        }
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::Unavailable(pin_num))
    }

    pub fn contains(&self, pin_num: u8) -> bool {
        pin_num < GPIO_COUNT && self.pins[pin_num as usize].is_some()
    }
}
