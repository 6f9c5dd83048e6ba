//! SD card round trip
//!
//! Writes a small file, appends to it twice, then reads it back. Runs
//! against any mounted `Filesystem`.

use core::fmt::{self, Write as _};

use heapless::String;

use crate::storage::{Filesystem, WriteMode};

/// File the round trip works on
pub const DEMO_FILE: &str = "PICO.TXT";

/// Contents written when the file is created
pub const OPEN_LINE: &str = "opened pico.txt to write\r\n";

/// First appended line
pub const APPEND_LINE: &str = "appending to pico.txt\r\n";

/// Round trip failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoError<E> {
    /// Filesystem operation failed
    Fs(E),
    /// Read back fewer bytes than were written
    ShortRead { expected: usize, got: usize },
}

impl<E: fmt::Display> fmt::Display for DemoError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::Fs(e) => write!(f, "filesystem error: {}", e),
            DemoError::ShortRead { expected, got } => {
                write!(f, "read back {} of {} bytes", got, expected)
            }
        }
    }
}

/// Temperature line as appended to the file
pub fn temperature_line(celsius: f32) -> String<48> {
    let mut line = String::new();
    // Cannot overflow: the sensor range keeps this well under 48 bytes
    let _ = write!(line, "temperature is {:.6} C\n", celsius);
    line
}

/// Run the round trip, leaving the file contents in `buf`
///
/// Returns the number of bytes read back.
pub fn round_trip<F: Filesystem>(
    fs: &mut F,
    celsius: f32,
    buf: &mut [u8],
) -> Result<usize, DemoError<F::Error>> {
    let temperature = temperature_line(celsius);
    let chunks = [
        (OPEN_LINE, WriteMode::Truncate),
        (APPEND_LINE, WriteMode::Append),
        (temperature.as_str(), WriteMode::Append),
    ];

    let mut expected = 0;
    for (text, mode) in chunks {
        fs.write(DEMO_FILE, text.as_bytes(), mode)
            .map_err(DemoError::Fs)?;
        expected += text.len();
    }

    let mut total = 0;
    while total < buf.len() {
        let n = fs
            .read_at(DEMO_FILE, total as u32, &mut buf[total..])
            .map_err(DemoError::Fs)?;
        if n == 0 {
            break;
        }
        total += n;
    }

    if total < expected.min(buf.len()) {
        return Err(DemoError::ShortRead {
            expected,
            got: total,
        });
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemFs, MemFsError};

    fn mounted() -> MemFs {
        let mut fs = MemFs::default();
        crate::storage::Filesystem::mount(&mut fs).unwrap();
        fs
    }

    #[test]
    fn test_temperature_line_format() {
        assert_eq!(temperature_line(21.5).as_str(), "temperature is 21.500000 C\n");
    }

    #[test]
    fn test_round_trip_contents() {
        let mut fs = mounted();
        let mut buf = [0u8; 256];

        let n = round_trip(&mut fs, 20.0, &mut buf).unwrap();

        assert_eq!(
            core::str::from_utf8(&buf[..n]).unwrap(),
            "opened pico.txt to write\r\nappending to pico.txt\r\ntemperature is 20.000000 C\n"
        );
    }

    #[test]
    fn test_existing_file_is_replaced() {
        let mut fs = mounted();
        fs.files.insert("/PICO.TXT".into(), b"stale data from last boot\n".to_vec());
        let mut buf = [0u8; 256];

        let n = round_trip(&mut fs, 25.0, &mut buf).unwrap();

        assert!(buf[..n].starts_with(OPEN_LINE.as_bytes()));
        assert_eq!(fs.files["/PICO.TXT"].len(), n);
    }

    #[test]
    fn test_unmounted_volume_fails() {
        let mut fs = MemFs::default();
        let mut buf = [0u8; 64];
        assert_eq!(
            round_trip(&mut fs, 25.0, &mut buf),
            Err(DemoError::Fs(MemFsError::NotMounted))
        );
    }

    #[test]
    fn test_file_holds_exactly_the_three_chunks() {
        let mut fs = mounted();
        let mut buf = [0u8; 256];
        round_trip(&mut fs, 20.0, &mut buf).unwrap();

        let expected = OPEN_LINE.len() + APPEND_LINE.len() + temperature_line(20.0).len();
        assert_eq!(fs.files["/PICO.TXT"].len(), expected);
    }

    #[test]
    fn test_small_buffer_reads_what_fits() {
        let mut fs = mounted();
        let mut buf = [0u8; 10];
        assert_eq!(round_trip(&mut fs, 25.0, &mut buf), Ok(10));
        assert_eq!(&buf, b"opened pic");
    }
}
