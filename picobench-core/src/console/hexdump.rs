//! `xxd`-style hex dump rows

use core::fmt::Write as _;

use heapless::String;

/// Bytes shown per row
pub const ROW_LEN: usize = 16;

/// Widest possible row: offset, 8 groups, gap, ASCII column
pub const ROW_CAPACITY: usize = 9 + 8 * 5 + 2 + ROW_LEN;

/// Format one row starting at device offset `offset`
///
/// `00000010: 4865 6c6c 6f2c 2077 6f72 6c64 0d0a 0000  Hello, world....`
pub fn format_row(offset: u32, bytes: &[u8]) -> String<ROW_CAPACITY> {
    let bytes = &bytes[..bytes.len().min(ROW_LEN)];
    let mut row = String::new();
    let _ = write!(row, "{:08x}:", offset);

    for i in 0..ROW_LEN {
        if i % 2 == 0 {
            let _ = row.push(' ');
        }
        match bytes.get(i) {
            Some(b) => {
                let _ = write!(row, "{:02x}", b);
            }
            None => {
                let _ = row.push_str("  ");
            }
        }
    }

    let _ = row.push_str("  ");
    for &b in bytes {
        let c = if b.is_ascii_graphic() || b == b' ' {
            b as char
        } else {
            '.'
        };
        let _ = row.push(c);
    }
    row
}
