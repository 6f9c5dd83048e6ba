//! 25-series SPI NOR command set

/// Read manufacturer, memory type and capacity
pub const READ_JEDEC_ID: u8 = 0x9F;
/// Read data, 3-byte address
pub const READ_DATA: u8 = 0x03;
/// Program up to one page, 3-byte address
pub const PAGE_PROGRAM: u8 = 0x02;
/// Erase one 4 KiB sector, 3-byte address
pub const SECTOR_ERASE: u8 = 0x20;
/// Set the write enable latch
pub const WRITE_ENABLE: u8 = 0x06;
/// Read status register 1
pub const READ_STATUS: u8 = 0x05;
/// Write status register 1
pub const WRITE_STATUS: u8 = 0x01;

/// Write in progress bit of status register 1
pub const STATUS_BUSY: u8 = 1 << 0;

/// Bytes one page program can write
pub const PAGE_SIZE: u32 = 256;

/// Bytes one sector erase clears
pub const SECTOR_SIZE: u32 = 4096;

/// Command byte followed by a big-endian 24-bit address
pub fn with_address(command: u8, address: u32) -> [u8; 4] {
    let [_, a2, a1, a0] = address.to_be_bytes();
    [command, a2, a1, a0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_address() {
        assert_eq!(with_address(READ_DATA, 0x0012_3456), [0x03, 0x12, 0x34, 0x56]);
    }
}
