//! 512-byte block view of NOR flash
//!
//! The FAT layer reads and writes whole 512-byte blocks, but NOR flash can
//! only be erased in larger sectors. A multi-block write reads each erase
//! sector it touches into a scratch buffer once, patches every block that
//! lands in it, then erases and reprograms the sector once. Sectors whose
//! contents would not change are left alone.
//!
//! The device is shared by reference: the volume manager and the console's
//! raw dump both hold `&FlashBlockDevice`, so the flash lives in a
//! `RefCell`. Access is single-threaded and never re-entrant.

use core::cell::RefCell;

use embedded_sdmmc::{Block, BlockCount, BlockIdx};
use embedded_storage::nor_flash::NorFlash;
use picobench_core::storage::{Configure, SECTOR_SIZE};
use picobench_hal::block::{BlockDevice, Geometry};

/// Largest erase sector the scratch buffer can hold
pub const MAX_ERASE_SIZE: usize = 4096;

pub struct FlashBlockDevice<F> {
    flash: RefCell<F>,
    scratch: RefCell<[u8; MAX_ERASE_SIZE]>,
}

impl<F: NorFlash> FlashBlockDevice<F> {
    pub fn new(flash: F) -> Self {
        assert!(
            F::ERASE_SIZE <= MAX_ERASE_SIZE && F::ERASE_SIZE % SECTOR_SIZE == 0,
            "erase sector must be a multiple of the block size and fit the scratch buffer"
        );
        Self {
            flash: RefCell::new(flash),
            scratch: RefCell::new([0; MAX_ERASE_SIZE]),
        }
    }

    pub fn release(self) -> F {
        self.flash.into_inner()
    }

    /// Whole 512-byte blocks on the device
    pub fn block_count(&self) -> u32 {
        (self.flash.borrow().capacity() / SECTOR_SIZE) as u32
    }

    /// Run `f` with the underlying flash, e.g. to retune its bus
    pub fn with_flash<R>(&self, f: impl FnOnce(&mut F) -> R) -> R {
        f(&mut self.flash.borrow_mut())
    }

    pub fn read_blocks(&self, start_block: u32, buf: &mut [u8]) -> Result<(), F::Error> {
        self.flash
            .borrow_mut()
            .read(start_block * SECTOR_SIZE as u32, buf)
    }

    /// Replace consecutive blocks from `start_block` on
    ///
    /// Each erase sector touched is erased at most once, however many of
    /// its blocks change.
    pub fn write_blocks<'b>(
        &self,
        start_block: u32,
        blocks: impl IntoIterator<Item = &'b [u8; SECTOR_SIZE]>,
    ) -> Result<(), F::Error> {
        let mut flash = self.flash.borrow_mut();
        let mut scratch = self.scratch.borrow_mut();
        let scratch = &mut scratch[..F::ERASE_SIZE];
        let erase_size = F::ERASE_SIZE as u32;
        let blocks_per_sector = erase_size / SECTOR_SIZE as u32;

        // Sector held in `scratch`, and whether it differs from the flash
        let mut loaded: Option<(u32, bool)> = None;
        for (i, data) in blocks.into_iter().enumerate() {
            let block = start_block + i as u32;
            let sector = block / blocks_per_sector * erase_size;

            if loaded.map(|(address, _)| address) != Some(sector) {
                if let Some((address, true)) = loaded {
                    program_sector(&mut *flash, address, scratch)?;
                }
                flash.read(sector, scratch)?;
                loaded = Some((sector, false));
            }

            let within = (block % blocks_per_sector) as usize * SECTOR_SIZE;
            let slot = &mut scratch[within..within + SECTOR_SIZE];
            if slot != data.as_slice() {
                slot.copy_from_slice(data);
                loaded = Some((sector, true));
            }
        }

        if let Some((address, true)) = loaded {
            program_sector(&mut *flash, address, scratch)?;
        }
        Ok(())
    }
}

fn program_sector<F: NorFlash>(
    flash: &mut F,
    address: u32,
    contents: &[u8],
) -> Result<(), F::Error> {
    flash.erase(address, address + F::ERASE_SIZE as u32)?;
    flash.write(address, contents)
}

impl<F: NorFlash + Configure> Configure for FlashBlockDevice<F> {
    type Config = F::Config;
    type Error = <F as Configure>::Error;

    fn configure(&mut self, config: &F::Config) -> Result<(), Self::Error> {
        self.flash.get_mut().configure(config)
    }
}

impl<F: NorFlash> embedded_sdmmc::BlockDevice for &FlashBlockDevice<F> {
    type Error = F::Error;

    fn read(
        &self,
        blocks: &mut [Block],
        start_block_idx: BlockIdx,
        _reason: &str,
    ) -> Result<(), F::Error> {
        for (i, block) in blocks.iter_mut().enumerate() {
            self.read_blocks(start_block_idx.0 + i as u32, &mut block.contents)?;
        }
        Ok(())
    }

    fn write(&self, blocks: &[Block], start_block_idx: BlockIdx) -> Result<(), F::Error> {
        self.write_blocks(start_block_idx.0, blocks.iter().map(|b| &b.contents))
    }

    fn num_blocks(&self) -> Result<BlockCount, F::Error> {
        Ok(BlockCount(self.block_count()))
    }
}

/// Raw access for the console's `xxd`, `erase` and `lsblk`
impl<F: NorFlash> BlockDevice for &FlashBlockDevice<F> {
    type Error = F::Error;

    fn read_at(&mut self, buf: &mut [u8], offset: u32) -> Result<usize, F::Error> {
        let size = self.size();
        if offset >= size {
            return Ok(0);
        }
        let len = buf.len().min((size - offset) as usize);
        self.flash.borrow_mut().read(offset, &mut buf[..len])?;
        Ok(len)
    }

    fn erase_blocks(&mut self, start: u32, count: u32) -> Result<(), F::Error> {
        // Saturated ends are unaligned, so the flash driver rejects them
        let erase_size = F::ERASE_SIZE as u32;
        let from = start.saturating_mul(erase_size);
        let to = start.saturating_add(count).saturating_mul(erase_size);
        self.flash.borrow_mut().erase(from, to)
    }

    fn geometry(&self) -> Geometry {
        let size = self.flash.borrow().capacity() as u32;
        if size == 0 {
            return Geometry {
                size: 0,
                write_block_size: 0,
                erase_block_size: 0,
            };
        }
        Geometry {
            size,
            write_block_size: F::WRITE_SIZE as u32,
            erase_block_size: F::ERASE_SIZE as u32,
        }
    }
}
