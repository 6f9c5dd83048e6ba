//! SPI device with a manual chip select
//!
//! Flash chips and SD cards share the `embedded-hal` `SpiDevice` contract:
//! chip select is asserted for the whole transaction and released after,
//! even when an operation fails.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorType, Operation, SpiBus, SpiDevice};
use picobench_hal::OutputPin;

/// Exclusive SPI bus plus an active-low chip select
pub struct ChipSelectDevice<B, CS, D> {
    bus: B,
    cs: CS,
    delay: D,
}

impl<B: SpiBus, CS: OutputPin, D: DelayNs> ChipSelectDevice<B, CS, D> {
    /// Take the bus and deselect the device
    pub fn new(bus: B, mut cs: CS, delay: D) -> Self {
        cs.set_high();
        Self { bus, cs, delay }
    }

    /// Direct bus access, e.g. to change the clock rate
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn release(self) -> (B, CS, D) {
        (self.bus, self.cs, self.delay)
    }

    fn run(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), B::Error> {
        for op in operations {
            match op {
                Operation::Read(buf) => self.bus.read(buf)?,
                Operation::Write(buf) => self.bus.write(buf)?,
                Operation::Transfer(read, write) => self.bus.transfer(read, write)?,
                Operation::TransferInPlace(buf) => self.bus.transfer_in_place(buf)?,
                Operation::DelayNs(ns) => {
                    self.bus.flush()?;
                    self.delay.delay_ns(*ns);
                }
            }
        }
        self.bus.flush()
    }
}

impl<B: SpiBus, CS, D> ErrorType for ChipSelectDevice<B, CS, D> {
    type Error = B::Error;
}

impl<B: SpiBus, CS: OutputPin, D: DelayNs> SpiDevice for ChipSelectDevice<B, CS, D> {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.cs.set_low();
        let result = self.run(operations);
        self.cs.set_high();
        result
    }
}
