//! Digital outputs
//!
//! The LED and the storage chip selects are plain push-pull outputs on
//! pins the board profile already validated, so driving them cannot fail.

/// A push-pull output whose last driven level can be read back
pub trait OutputPin {
    fn set_high(&mut self);

    fn set_low(&mut self);

    /// Drive `high` or low
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }

    /// Level last driven, not the level sensed on the pad
    fn is_set_high(&self) -> bool;

    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

impl<T: OutputPin + ?Sized> OutputPin for &mut T {
    fn set_high(&mut self) {
        T::set_high(self)
    }

    fn set_low(&mut self) {
        T::set_low(self)
    }

    fn is_set_high(&self) -> bool {
        T::is_set_high(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Latch(bool);

    impl OutputPin for Latch {
        fn set_high(&mut self) {
            self.0 = true;
        }

        fn set_low(&mut self) {
            self.0 = false;
        }

        fn is_set_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_toggle_flips_state() {
        let mut pin = Latch(false);
        pin.toggle();
        assert!(pin.is_set_high());
        pin.toggle();
        assert!(pin.is_set_low());
    }

    #[test]
    fn test_set_state_through_reference() {
        let mut pin = Latch(false);
        {
            let mut borrowed = &mut pin;
            OutputPin::set_state(&mut borrowed, true);
        }
        assert!(pin.is_set_high());
    }
}
