//! RP2040 pin function tables
//!
//! Each GPIO can be routed to one SPI signal and one UART signal. The
//! assignments repeat every four pins, and the peripheral instance
//! alternates in blocks of eight.

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// SPI peripheral instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiBus {
    Spi0,
    Spi1,
}

/// SPI signal a GPIO can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiSignal {
    /// Controller in, peripheral out
    Rx,
    /// Hardware chip select
    Csn,
    /// Clock
    Sck,
    /// Controller out, peripheral in
    Tx,
}

/// UART peripheral instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBus {
    Uart0,
    Uart1,
}

/// UART signal a GPIO can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartSignal {
    Tx,
    Rx,
    Cts,
    Rts,
}

/// SPI function of a GPIO, if it has one
pub fn spi_function(gpio: u8) -> Option<(SpiBus, SpiSignal)> {
    if gpio >= GPIO_COUNT {
        return None;
    }
    let bus = if (gpio / 8) % 2 == 0 {
        SpiBus::Spi0
    } else {
        SpiBus::Spi1
    };
    let signal = match gpio % 4 {
        0 => SpiSignal::Rx,
        1 => SpiSignal::Csn,
        2 => SpiSignal::Sck,
        _ => SpiSignal::Tx,
    };
    Some((bus, signal))
}

/// UART function of a GPIO, if it has one
pub fn uart_function(gpio: u8) -> Option<(UartBus, UartSignal)> {
    if gpio >= GPIO_COUNT {
        return None;
    }
    // UART0 starts at GPIO0, UART1 at GPIO4, then they alternate every 8 pins
    let bus = if ((gpio + 4) / 8) % 2 == 0 {
        UartBus::Uart0
    } else {
        UartBus::Uart1
    };
    let signal = match gpio % 4 {
        0 => UartSignal::Tx,
        1 => UartSignal::Rx,
        2 => UartSignal::Cts,
        _ => UartSignal::Rts,
    };
    Some((bus, signal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spi_function_datasheet_rows() {
        assert_eq!(spi_function(0), Some((SpiBus::Spi0, SpiSignal::Rx)));
        assert_eq!(spi_function(10), Some((SpiBus::Spi1, SpiSignal::Sck)));
        assert_eq!(spi_function(11), Some((SpiBus::Spi1, SpiSignal::Tx)));
        assert_eq!(spi_function(12), Some((SpiBus::Spi1, SpiSignal::Rx)));
        assert_eq!(spi_function(18), Some((SpiBus::Spi0, SpiSignal::Sck)));
        assert_eq!(spi_function(19), Some((SpiBus::Spi0, SpiSignal::Tx)));
        assert_eq!(spi_function(20), Some((SpiBus::Spi0, SpiSignal::Rx)));
        assert_eq!(spi_function(28), Some((SpiBus::Spi1, SpiSignal::Rx)));
        assert_eq!(spi_function(30), None);
    }

    #[test]
    fn test_uart_function_datasheet_rows() {
        assert_eq!(uart_function(0), Some((UartBus::Uart0, UartSignal::Tx)));
        assert_eq!(uart_function(1), Some((UartBus::Uart0, UartSignal::Rx)));
        assert_eq!(uart_function(4), Some((UartBus::Uart1, UartSignal::Tx)));
        assert_eq!(uart_function(8), Some((UartBus::Uart1, UartSignal::Tx)));
        assert_eq!(uart_function(12), Some((UartBus::Uart0, UartSignal::Tx)));
        assert_eq!(uart_function(17), Some((UartBus::Uart0, UartSignal::Rx)));
        assert_eq!(uart_function(21), Some((UartBus::Uart1, UartSignal::Rx)));
        assert_eq!(uart_function(25), Some((UartBus::Uart1, UartSignal::Rx)));
        assert_eq!(uart_function(28), Some((UartBus::Uart0, UartSignal::Tx)));
        assert_eq!(uart_function(29), Some((UartBus::Uart0, UartSignal::Rx)));
    }
}
