//! UART console configuration
//!
//! RP2040 has two UART peripherals (UART0 and UART1). The console runs on
//! whichever one the board profile names, 8N1 with no flow control.

use embassy_rp::uart;

pub use picobench_core::board::UartBus;

/// UART config for the debug console at `baud_rate`
pub fn console_config(baud_rate: u32) -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = baud_rate;
    config.data_bits = uart::DataBits::DataBits8;
    config.stop_bits = uart::StopBits::STOP1;
    config.parity = uart::Parity::ParityNone;
    config
}
