//! GPIO outputs
//!
//! Wraps embassy's `Output` so the board-agnostic code in `picobench-core`
//! can drive it through `picobench_hal::OutputPin`.

use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::Peri;
use picobench_hal::OutputPin;

/// Push-pull GPIO output
pub struct GpioOutput<'d> {
    pin: Output<'d>,
}

impl<'d> GpioOutput<'d> {
    /// Configure `pin` as an output at the given level
    pub fn new(pin: Peri<'d, AnyPin>, initially_high: bool) -> Self {
        let level = if initially_high { Level::High } else { Level::Low };
        Self {
            pin: Output::new(pin, level),
        }
    }

    /// Access the underlying embassy output
    pub fn inner(&mut self) -> &mut Output<'d> {
        &mut self.pin
    }
}

impl OutputPin for GpioOutput<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn toggle(&mut self) {
        self.pin.toggle();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
