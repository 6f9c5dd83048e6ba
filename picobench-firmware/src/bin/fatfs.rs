//! FAT console over external SPI NOR flash
//!
//! Identifies the flash chip, mounts its FAT volume and serves an
//! interactive shell on the console UART. If the chip cannot be configured
//! the reason is printed on the console every five seconds, forever.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_time::Delay;
use picobench_core::bringup::{FaultReporter, Sequencer};
use picobench_core::console::Console;
use picobench_drivers::{ChipSelectDevice, FatFs, FixedTimeSource, FlashBlockDevice, SpiFlash};
use picobench_firmware::wiring::{self, Wiring};
use picobench_firmware::settings;
use picobench_hal::{OutputPin, SpiConfig};
use picobench_hal_rp2040::{uart, BoardSpi, GpioOutput};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

type FlashBus = ChipSelectDevice<BoardSpi, GpioOutput<'static>, Delay>;
type Device = FlashBlockDevice<SpiFlash<FlashBus>>;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Shared by the volume manager and the console's raw dump
static DEVICE: StaticCell<Device> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("fatfs starting...");

    let p = embassy_rp::init(Default::default());
    let config = settings::load();

    let spi_config = SpiConfig::default().with_frequency(config.flash_spi_hz);
    let Wiring {
        spi,
        cs,
        mut led,
        console,
        ..
    } = unwrap!(wiring::wire(config.board, p, &spi_config));

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart_config = uart::console_config(config.console_baud_rate);
    let mut uart = Uart::new_blocking(console.uart, console.tx, console.rx, uart_config)
        .into_buffered(Irqs, tx_buf, rx_buf);
    info!("Console UART initialized");

    let flash = SpiFlash::new(ChipSelectDevice::new(spi, cs, Delay));
    let device = DEVICE.init(FlashBlockDevice::new(flash));

    let mut sequencer = Sequencer::new();
    match sequencer.bring_up(device, |device| {
        FatFs::new(device, FixedTimeSource::default())
    }) {
        Ok((device, fs)) => {
            info!("Flash ready: {} blocks", device.block_count());
            if let Some(max_clock_hz) = device.with_flash(|f| f.attributes().map(|a| a.max_clock_hz)) {
                let clock = spi_config.limited_to(max_clock_hz);
                device.with_flash(|f| f.spi_mut().bus_mut().set_frequency(clock.frequency));
                info!("Flash SPI clock: {} Hz", clock.frequency);
            }
            sequencer.console_started();
            led.set_high();
            Console::new(uart, device, fs).run().await
        }
        Err(fault) => {
            let mut reporter = FaultReporter::new(&fault);
            error!("Bring-up stopped in {}: {}", sequencer.stage(), reporter.message());
            let mut delay = Delay;
            loop {
                let _ = reporter.tick(&mut delay, &mut uart).await;
                error!("{}", reporter.message());
            }
        }
    }
}
