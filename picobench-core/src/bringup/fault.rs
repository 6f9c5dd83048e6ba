//! Reporting a bring-up fault
//!
//! A faulted program never recovers. It sleeps for the report interval
//! and writes the rendered fault to the console, forever.

use core::fmt::{self, Write as _};

use embedded_hal_async::delay::DelayNs;
use embedded_io_async::Write;
use heapless::String;

/// Time between reports
pub const REPORT_INTERVAL_MS: u32 = 5_000;

/// Longest report kept; longer renders are cut short
pub const MAX_MESSAGE_LEN: usize = 128;

/// Re-emits one fault description on a fixed interval
pub struct FaultReporter {
    message: String<MAX_MESSAGE_LEN>,
    interval_ms: u32,
}

impl FaultReporter {
    /// Render `fault` once; every report reuses the rendering
    pub fn new(fault: &impl fmt::Display) -> Self {
        let mut message = String::new();
        let _ = write!(Truncating(&mut message), "{}", fault);
        Self {
            message,
            interval_ms: REPORT_INTERVAL_MS,
        }
    }

    /// The rendered report, without line ending
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Wait one interval, then emit the report
    pub async fn tick<D: DelayNs, W: Write>(
        &mut self,
        delay: &mut D,
        out: &mut W,
    ) -> Result<(), W::Error> {
        delay.delay_ms(self.interval_ms).await;
        out.write_all(self.message.as_bytes()).await?;
        out.write_all(b"\r\n").await?;
        out.flush().await
    }
}

/// `fmt::Write` that drops whatever does not fit
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> fmt::Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDelay, Transcript};
    use embassy_futures::block_on;

    struct CrcMismatch;

    impl fmt::Display for CrcMismatch {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Config was not valid: CRC mismatch")
        }
    }

    #[test]
    fn test_reports_once_per_interval() {
        let mut reporter = FaultReporter::new(&CrcMismatch);
        let mut delay = MockDelay::default();
        let mut out = Transcript::default();

        block_on(async {
            for _ in 0..3 {
                reporter.tick(&mut delay, &mut out).await.unwrap();
            }
        });

        assert_eq!(delay.elapsed_ms, 3 * 5_000);
        assert_eq!(
            out.output_str(),
            "Config was not valid: CRC mismatch\r\n".repeat(3)
        );
    }

    #[test]
    fn test_new_renders_message_and_interval() {
        let reporter = FaultReporter::new(&CrcMismatch);
        assert_eq!(reporter.interval_ms(), REPORT_INTERVAL_MS);
        assert_eq!(reporter.message(), "Config was not valid: CRC mismatch");
    }

    #[test]
    fn test_first_report_follows_a_full_interval() {
        let mut reporter = FaultReporter::new(&CrcMismatch);
        let mut delay = MockDelay::default();
        let mut out = Transcript::default();
        assert!(out.output_str().is_empty());

        block_on(reporter.tick(&mut delay, &mut out)).unwrap();

        assert_eq!(delay.elapsed_ms, 5_000);
        assert_eq!(out.output_str(), "Config was not valid: CRC mismatch\r\n");
    }

    #[test]
    fn test_long_message_truncated() {
        struct Long;
        impl fmt::Display for Long {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for _ in 0..(MAX_MESSAGE_LEN + 10) {
                    f.write_str("x")?;
                }
                Ok(())
            }
        }
        let reporter = FaultReporter::new(&Long);
        assert_eq!(reporter.message().len(), MAX_MESSAGE_LEN);
    }
}
