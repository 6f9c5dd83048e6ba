//! SD card round trip
//!
//! Mounts the first FAT volume on an SD card wired to the board's storage
//! SPI bus, writes `PICO.TXT`, appends to it twice (the second time with
//! the die temperature), then reads it back. Success blinks the LED fast;
//! any failure parks in an error loop.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_time::{Delay, Timer};
use embedded_sdmmc::SdCard;
use picobench_core::blink::Blinker;
use picobench_core::demo;
use picobench_core::storage::{Configure, Filesystem, FsConfig};
use picobench_drivers::{ChipSelectDevice, FatFs, FixedTimeSource};
use picobench_firmware::wiring::{self, Wiring};
use picobench_firmware::settings;
use picobench_hal::SpiConfig;
use picobench_hal_rp2040::adc::read_temperature;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
});

/// SPI clock once the card has been initialized
const SD_RUN_HZ: u32 = 16_000_000;

/// LED half-period after a successful run
const SUCCESS_BLINK_MS: u32 = 100;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("sdcard starting...");

    let p = embassy_rp::init(Default::default());
    let config = settings::load();

    // Card initialization happens at a low clock rate
    let Wiring {
        spi,
        cs,
        led,
        adc,
        temp_sensor,
        ..
    } = unwrap!(wiring::wire(config.board, p, &SpiConfig::SD_INIT));

    let mut adc = Adc::new(adc, Irqs, adc::Config::default());
    let mut sensor = Channel::new_temp_sensor(temp_sensor);

    info!("Initialize SPI SD/MMC data structures...");
    let sdcard = SdCard::new(ChipSelectDevice::new(spi, cs, Delay), Delay);

    info!("Init SD card controller and retrieve card size...");
    match sdcard.num_bytes() {
        Ok(size) => info!("card size is {} bytes", size),
        Err(e) => error!("Error retrieving card size: {}", Debug2Format(&e)),
    }

    // Now that the card is initialized, the SPI clock can go faster
    sdcard.spi(|dev| dev.bus_mut().set_frequency(SD_RUN_HZ));

    let mut fs = FatFs::new(sdcard, FixedTimeSource::default());
    if let Err(e) = fs.configure(&FsConfig::default()) {
        error!("Error configuring filesystem: {}", Display2Format(&e));
        error_loop().await
    }

    info!("Getting Volume 0...");
    if let Err(e) = fs.mount() {
        error!("Error getting volume 0: {}", Display2Format(&e));
        error_loop().await
    }

    let celsius = match read_temperature(&mut adc, &mut sensor).await {
        Ok(celsius) => celsius,
        Err(e) => {
            error!("Error reading temperature: {}", e);
            error_loop().await
        }
    };

    let mut buf = [0u8; 256];
    match demo::round_trip(&mut fs, celsius, &mut buf) {
        Ok(n) => {
            info!("Read {} bytes from {}:", n, demo::DEMO_FILE);
            let text = core::str::from_utf8(&buf[..n]).unwrap_or("<not UTF-8>");
            for line in text.lines() {
                info!("{}", line);
            }
        }
        Err(e) => {
            error!("{}", Display2Format(&e));
            error_loop().await
        }
    }

    if let Err(e) = fs.unmount() {
        warn!("Error closing volume: {}", Display2Format(&e));
    }

    info!("All operations successful");
    Blinker::with_half_period(led, SUCCESS_BLINK_MS)
        .run(&mut Delay)
        .await
}

async fn error_loop() -> ! {
    loop {
        error!("error loop");
        Timer::after_secs(5).await;
    }
}
