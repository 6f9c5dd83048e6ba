//! LED blink loop

use embedded_hal_async::delay::DelayNs;
use picobench_hal::OutputPin;

/// Time the LED spends in each level
pub const HALF_PERIOD_MS: u32 = 1_000;

/// Expected LED level `elapsed_ms` after the loop started
///
/// The loop drives the pin high first, so the level is high during even
/// half-periods.
pub fn level_at(elapsed_ms: u64, half_period_ms: u32) -> bool {
    (elapsed_ms / u64::from(half_period_ms.max(1))) % 2 == 0
}

/// Square-wave driver for one output pin
pub struct Blinker<P: OutputPin> {
    pin: P,
    half_period_ms: u32,
}

impl<P: OutputPin> Blinker<P> {
    /// Blink with the default one second half-period
    pub fn new(pin: P) -> Self {
        Self::with_half_period(pin, HALF_PERIOD_MS)
    }

    pub fn with_half_period(pin: P, half_period_ms: u32) -> Self {
        Self {
            pin,
            half_period_ms,
        }
    }

    pub fn half_period_ms(&self) -> u32 {
        self.half_period_ms
    }

    /// One full period: high, wait, low, wait
    pub async fn cycle<D: DelayNs>(&mut self, delay: &mut D) {
        self.pin.set_high();
        delay.delay_ms(self.half_period_ms).await;
        self.pin.set_low();
        delay.delay_ms(self.half_period_ms).await;
    }

    /// Blink forever
    pub async fn run<D: DelayNs>(mut self, delay: &mut D) -> ! {
        loop {
            self.cycle(delay).await;
        }
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDelay;
    use embassy_futures::block_on;
    use proptest::prelude::*;
    use std::vec::Vec;

    /// Pin that records every level it is driven to
    #[derive(Default)]
    struct RecordingPin {
        high: bool,
        history: Vec<bool>,
    }

    impl OutputPin for RecordingPin {
        fn set_high(&mut self) {
            self.high = true;
            self.history.push(true);
        }

        fn set_low(&mut self) {
            self.high = false;
            self.history.push(false);
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_cycle_drives_high_then_low() {
        let mut blinker = Blinker::new(RecordingPin::default());
        let mut delay = MockDelay::default();

        block_on(async {
            blinker.cycle(&mut delay).await;
            blinker.cycle(&mut delay).await;
        });

        assert_eq!(delay.elapsed_ms, 4_000);
        assert_eq!(delay.calls, 4);
        let pin = blinker.release();
        assert_eq!(pin.history, [true, false, true, false]);
        assert!(!pin.high);
    }

    #[test]
    fn test_level_boundaries() {
        assert!(level_at(0, 1_000));
        assert!(level_at(999, 1_000));
        assert!(!level_at(1_000, 1_000));
        assert!(!level_at(1_999, 1_000));
        assert!(level_at(2_000, 1_000));
    }

    proptest! {
        #[test]
        fn prop_level_matches_parity(t in 0u64..10_000_000) {
            prop_assert_eq!(level_at(t, HALF_PERIOD_MS), (t / 1_000) % 2 == 0);
        }

        #[test]
        fn prop_simulated_pin_matches_level(cycles in 1usize..20) {
            let mut blinker = Blinker::with_half_period(RecordingPin::default(), 250);
            let mut delay = MockDelay::default();
            block_on(async {
                for _ in 0..cycles {
                    blinker.cycle(&mut delay).await;
                }
            });
            let history = blinker.release().history;
            for (i, level) in history.iter().enumerate() {
                let t = i as u64 * 250;
                prop_assert_eq!(*level, level_at(t, 250));
            }
        }
    }
}
