//! Block storage abstractions
//!
//! A block device is raw storage read by byte offset and erased in fixed
//! blocks. SPI NOR flash, SD cards and RAM disks all fit this shape.

/// Geometry of a block device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// Total size in bytes
    pub size: u32,
    /// Smallest unit that can be programmed in one operation
    pub write_block_size: u32,
    /// Smallest unit that can be erased
    pub erase_block_size: u32,
}

impl Geometry {
    /// Number of erase blocks on the device
    pub fn erase_block_count(&self) -> u32 {
        if self.erase_block_size == 0 {
            0
        } else {
            self.size / self.erase_block_size
        }
    }
}

/// Byte-addressed block device
///
/// Offsets are absolute from the start of the device. Implementations report
/// a zero-sized geometry until they have been configured.
pub trait BlockDevice {
    /// Error type for device operations
    type Error;

    /// Read `buf.len()` bytes starting at `offset`
    ///
    /// Returns the number of bytes read.
    fn read_at(&mut self, buf: &mut [u8], offset: u32) -> Result<usize, Self::Error>;

    /// Erase `count` erase blocks starting at erase block `start`
    ///
    /// Ranges past the end of the device are rejected, not truncated.
    fn erase_blocks(&mut self, start: u32, count: u32) -> Result<(), Self::Error>;

    /// Device geometry
    fn geometry(&self) -> Geometry;

    /// Total size in bytes
    fn size(&self) -> u32 {
        self.geometry().size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erase_block_count() {
        let geometry = Geometry {
            size: 2 * 1024 * 1024,
            write_block_size: 256,
            erase_block_size: 4096,
        };
        assert_eq!(geometry.erase_block_count(), 512);
    }

    #[test]
    fn test_unconfigured_geometry_has_no_blocks() {
        let geometry = Geometry {
            size: 0,
            write_block_size: 0,
            erase_block_size: 0,
        };
        assert_eq!(geometry.erase_block_count(), 0);
    }
}
