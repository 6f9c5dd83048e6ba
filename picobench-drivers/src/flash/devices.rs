//! Known SPI NOR parts, keyed by JEDEC ID

use core::fmt;

/// The three bytes a chip returns for `READ_JEDEC_ID`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JedecId {
    pub manufacturer: u8,
    pub memory_type: u8,
    pub capacity: u8,
}

impl JedecId {
    pub const fn new(manufacturer: u8, memory_type: u8, capacity: u8) -> Self {
        Self {
            manufacturer,
            memory_type,
            capacity,
        }
    }

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// A bus with no chip on it reads back all zeros or all ones
    pub fn is_blank(&self) -> bool {
        let bytes = [self.manufacturer, self.memory_type, self.capacity];
        bytes.iter().all(|&b| b == 0x00) || bytes.iter().all(|&b| b == 0xFF)
    }
}

impl fmt::Display for JedecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}{:02X}{:02X}",
            self.manufacturer, self.memory_type, self.capacity
        )
    }
}

/// What the driver needs to know about a part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAttributes {
    pub name: &'static str,
    pub jedec: JedecId,
    /// Bytes
    pub total_size: u32,
    pub max_clock_hz: u32,
    /// Part powers up with its sectors write-protected
    pub has_sector_protection: bool,
}

impl DeviceAttributes {
    /// Most 25-series parts encode the size as a power of two in the
    /// capacity byte
    pub const fn sized_by_capacity(name: &'static str, jedec: JedecId, max_clock_hz: u32) -> Self {
        Self {
            name,
            jedec,
            total_size: 1 << jedec.capacity,
            max_clock_hz,
            has_sector_protection: false,
        }
    }
}

/// How `SpiFlash` decides which part it is talking to
#[derive(Clone, Copy, Default)]
pub enum Identifier {
    /// Look the JEDEC ID up in `KNOWN_DEVICES`
    #[default]
    Default,
    /// Trust the given attributes, whatever the chip reports
    Fixed(DeviceAttributes),
    /// Ask a caller-supplied function
    Custom(fn(JedecId) -> Option<DeviceAttributes>),
}

impl Identifier {
    pub fn identify(&self, id: JedecId) -> Option<DeviceAttributes> {
        match self {
            Identifier::Default => lookup(id),
            Identifier::Fixed(attrs) => Some(*attrs),
            Identifier::Custom(f) => f(id),
        }
    }
}

const fn winbond(name: &'static str, memory_type: u8, capacity: u8) -> DeviceAttributes {
    DeviceAttributes::sized_by_capacity(
        name,
        JedecId::new(0xEF, memory_type, capacity),
        133_000_000,
    )
}

const fn gigadevice(name: &'static str, capacity: u8) -> DeviceAttributes {
    DeviceAttributes::sized_by_capacity(name, JedecId::new(0xC8, 0x40, capacity), 120_000_000)
}

const fn issi(name: &'static str, capacity: u8) -> DeviceAttributes {
    DeviceAttributes::sized_by_capacity(name, JedecId::new(0x9D, 0x60, capacity), 133_000_000)
}

const fn macronix(name: &'static str, capacity: u8) -> DeviceAttributes {
    DeviceAttributes::sized_by_capacity(name, JedecId::new(0xC2, 0x20, capacity), 104_000_000)
}

pub const KNOWN_DEVICES: &[DeviceAttributes] = &[
    winbond("W25Q16JV-IQ", 0x40, 0x15),
    winbond("W25Q16JV-IM", 0x70, 0x15),
    winbond("W25Q32", 0x40, 0x16),
    winbond("W25Q64", 0x40, 0x17),
    winbond("W25Q128", 0x40, 0x18),
    winbond("W25Q80DV", 0x40, 0x14),
    gigadevice("GD25Q16C", 0x15),
    gigadevice("GD25Q32", 0x16),
    gigadevice("GD25Q64", 0x17),
    issi("IS25LP080D", 0x14),
    issi("IS25LP128", 0x18),
    macronix("MX25L1606", 0x15),
    macronix("MX25L3233F", 0x16),
    DeviceAttributes::sized_by_capacity("S25FL116K", JedecId::new(0x01, 0x40, 0x15), 108_000_000),
    // Capacity byte is a density code, not a power of two
    DeviceAttributes {
        name: "AT25DF081A",
        jedec: JedecId::new(0x1F, 0x45, 0x01),
        total_size: 1024 * 1024,
        max_clock_hz: 85_000_000,
        has_sector_protection: true,
    },
];

pub fn lookup(id: JedecId) -> Option<DeviceAttributes> {
    KNOWN_DEVICES.iter().find(|d| d.jedec == id).copied()
}
