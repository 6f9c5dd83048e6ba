//! Blinks the board's status LED
//!
//! One second on, one second off, forever.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use picobench_core::blink::{Blinker, HALF_PERIOD_MS};
use picobench_firmware::{settings, wiring};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("blinky starting...");

    let p = embassy_rp::init(Default::default());
    let config = settings::load();

    let led = unwrap!(wiring::status_led(config.board, p));
    info!(
        "Blinking GPIO{} every {} ms",
        config.board.profile().led,
        HALF_PERIOD_MS
    );

    let mut blinker = Blinker::new(led);
    let mut delay = Delay;
    loop {
        blinker.cycle(&mut delay).await;
        trace!("blink");
    }
}
