//! Interactive storage console
//!
//! A line-oriented shell over any byte transport. It owns the block
//! device and the filesystem built on it: filesystem commands go through
//! [`Filesystem`], while `lsblk`, `xxd` and `erase` work on the raw device.
//!
//! Command failures are printed and the console carries on; only
//! transport errors are returned to the caller.

pub mod command;
pub mod hexdump;
pub mod line;

use core::fmt::{self, Write as _};

use embedded_io_async::{Read, Write};
use heapless::String;
use picobench_hal::BlockDevice;

pub use command::{Command, ParseError};
use command::COMMANDS;
use line::{Feed, LineEditor};

use crate::storage::{Filesystem, WriteMode};

/// Longest command line
pub const LINE_CAPACITY: usize = 128;

/// Shown before every command
pub const PROMPT: &str = "==> ";

/// Longest single formatted output line
const OUTPUT_CAPACITY: usize = 160;

/// Bytes moved per filesystem read in `cat`
const CAT_CHUNK: usize = 64;

/// Files created by `samples`
const SAMPLE_FILES: [(&str, &str); 2] = [
    ("HELLO.TXT", "Hello from picobench!\r\n"),
    (
        "LOREM.TXT",
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit,\r\n\
         sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.\r\n",
    ),
];

/// Multi-chunk sample, written with repeated appends
const NUMBERS_FILE: &str = "NUMBERS.TXT";
const NUMBERS_COUNT: u32 = 100;

/// Format into a bounded line and send it, with CRLF
macro_rules! sayln {
    ($console:expr, $($arg:tt)*) => {
        $console.print(format_args!($($arg)*), true).await?
    };
}

pub struct Console<IO, D, F> {
    io: IO,
    device: D,
    fs: F,
    editor: LineEditor<LINE_CAPACITY>,
    debug: bool,
}

impl<IO, D, F> Console<IO, D, F>
where
    IO: Read + Write,
    D: BlockDevice,
    D::Error: fmt::Display,
    F: Filesystem,
{
    pub fn new(io: IO, device: D, fs: F) -> Self {
        Self {
            io,
            device,
            fs,
            editor: LineEditor::new(),
            debug: false,
        }
    }

    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn filesystem_mut(&mut self) -> &mut F {
        &mut self.fs
    }

    /// Whether parsed commands are echoed before running
    pub fn debug(&self) -> bool {
        self.debug
    }

    async fn print(&mut self, args: fmt::Arguments<'_>, newline: bool) -> Result<(), IO::Error> {
        let mut text: String<OUTPUT_CAPACITY> = String::new();
        // Overlong output is cut at the last piece that fit
        let _ = text.write_fmt(args);
        self.io.write_all(text.as_bytes()).await?;
        if newline {
            self.io.write_all(b"\r\n").await?;
        }
        Ok(())
    }

    async fn prompt(&mut self) -> Result<(), IO::Error> {
        self.io.write_all(PROMPT.as_bytes()).await?;
        self.io.flush().await
    }

    /// Greet, try to mount the volume, and show the first prompt
    pub async fn start(&mut self) -> Result<(), IO::Error> {
        sayln!(self, "");
        sayln!(self, "picobench storage console, type help for commands");
        match self.fs.mount() {
            Ok(()) => sayln!(self, "mounted volume 0"),
            Err(e) => sayln!(self, "mount failed: {}", e),
        }
        self.prompt().await
    }

    /// Read whatever input is available and act on it
    ///
    /// Returns `false` when the transport reported end of input.
    pub async fn poll(&mut self) -> Result<bool, IO::Error> {
        let mut chunk = [0u8; 32];
        let n = self.io.read(&mut chunk).await?;
        if n == 0 {
            return Ok(false);
        }
        for &byte in &chunk[..n] {
            self.handle_byte(byte).await?;
        }
        Ok(true)
    }

    async fn handle_byte(&mut self, byte: u8) -> Result<(), IO::Error> {
        match self.editor.feed(byte) {
            Feed::Nothing => {}
            Feed::Echo(c) => self.io.write_all(&[c]).await?,
            Feed::Erase => self.io.write_all(b"\x08 \x08").await?,
            Feed::Line => {
                self.io.write_all(b"\r\n").await?;
                let line = self.editor.take();
                self.execute(&line).await?;
                self.prompt().await?;
            }
        }
        Ok(())
    }

    /// Serve the console forever
    pub async fn run(mut self) -> ! {
        let _ = self.start().await;
        loop {
            // Transport errors (overruns, framing) drop the chunk only
            let _ = self.poll().await;
        }
    }

    /// Parse and run one command line
    pub async fn execute(&mut self, line: &str) -> Result<(), IO::Error> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                sayln!(self, "{}", e);
                return Ok(());
            }
        };

        if self.debug && command != Command::Empty {
            sayln!(self, "[dbg] {:?}", command);
        }

        match command {
            Command::Empty => {}
            Command::Help => {
                for (usage, description) in COMMANDS {
                    sayln!(self, "  {:<24} {}", usage, description);
                }
            }
            Command::Lsblk => self.lsblk().await?,
            Command::Mount => match self.fs.mount() {
                Ok(()) => sayln!(self, "mounted volume 0"),
                Err(e) => sayln!(self, "mount failed: {}", e),
            },
            Command::Umount => match self.fs.unmount() {
                Ok(()) => sayln!(self, "unmounted"),
                Err(e) => sayln!(self, "error: {}", e),
            },
            Command::Ls(path) => self.ls(path).await?,
            Command::Mkdir(path) => match self.fs.make_dir(path) {
                Ok(()) => {}
                Err(e) => sayln!(self, "error: {}", e),
            },
            Command::Cat(path) => self.cat(path).await?,
            Command::Write { path, text } => self.write_text(path, text, WriteMode::Truncate).await?,
            Command::Append { path, text } => self.write_text(path, text, WriteMode::Append).await?,
            Command::Rm(path) => match self.fs.remove(path) {
                Ok(()) => {}
                Err(e) => sayln!(self, "error: {}", e),
            },
            Command::Xxd { offset, len } => self.xxd(offset, len).await?,
            Command::Erase { block, count } => self.erase(block, count).await?,
            Command::Samples => match self.write_samples() {
                Ok(count) => sayln!(self, "created {} sample files", count),
                Err(e) => sayln!(self, "error: {}", e),
            },
            Command::Dbg => {
                self.debug = !self.debug;
                sayln!(self, "debug {}", if self.debug { "on" } else { "off" });
            }
            Command::Format => {
                sayln!(self, "format is not supported; create the FAT volume on a host")
            }
        }
        Ok(())
    }

    async fn lsblk(&mut self) -> Result<(), IO::Error> {
        let geometry = self.device.geometry();
        sayln!(self, "size:             {} bytes", geometry.size);
        sayln!(self, "write block size: {} bytes", geometry.write_block_size);
        sayln!(self, "erase block size: {} bytes", geometry.erase_block_size);
        sayln!(self, "erase blocks:     {}", geometry.erase_block_count());
        Ok(())
    }

    async fn ls(&mut self, path: &str) -> Result<(), IO::Error> {
        let listing = match self.fs.list_dir(path) {
            Ok(listing) => listing,
            Err(e) => {
                sayln!(self, "error: {}", e);
                return Ok(());
            }
        };
        for entry in &listing.entries {
            if entry.is_dir {
                sayln!(self, "{:>10} {}/", "<DIR>", entry.name);
            } else {
                sayln!(self, "{:>10} {}", entry.size, entry.name);
            }
        }
        if listing.truncated {
            sayln!(self, "(listing truncated)");
        }
        Ok(())
    }

    async fn cat(&mut self, path: &str) -> Result<(), IO::Error> {
        let mut offset = 0u32;
        let mut last = b'\n';
        loop {
            let mut buf = [0u8; CAT_CHUNK];
            let n = match self.fs.read_at(path, offset, &mut buf) {
                Ok(n) => n,
                Err(e) => {
                    sayln!(self, "error: {}", e);
                    return Ok(());
                }
            };
            if n == 0 {
                break;
            }
            self.io.write_all(&buf[..n]).await?;
            last = buf[n - 1];
            offset += n as u32;
        }
        if last != b'\n' {
            self.io.write_all(b"\r\n").await?;
        }
        Ok(())
    }

    async fn write_text(&mut self, path: &str, text: &str, mode: WriteMode) -> Result<(), IO::Error> {
        let mut data: String<{ LINE_CAPACITY + 2 }> = String::new();
        let _ = data.push_str(text);
        let _ = data.push_str("\r\n");
        match self.fs.write(path, data.as_bytes(), mode) {
            Ok(n) => sayln!(self, "wrote {} bytes", n),
            Err(e) => sayln!(self, "error: {}", e),
        }
        Ok(())
    }

    async fn xxd(&mut self, offset: u32, len: u32) -> Result<(), IO::Error> {
        let size = self.device.size();
        if offset >= size {
            sayln!(self, "offset beyond end of device ({} bytes)", size);
            return Ok(());
        }
        let len = len.min(size - offset) as usize;
        let mut buf = [0u8; command::XXD_MAX_LEN as usize];
        let n = match self.device.read_at(&mut buf[..len], offset) {
            Ok(n) => n,
            Err(e) => {
                sayln!(self, "error: {}", e);
                return Ok(());
            }
        };
        for (i, row) in buf[..n].chunks(hexdump::ROW_LEN).enumerate() {
            let row_offset = offset + (i * hexdump::ROW_LEN) as u32;
            sayln!(self, "{}", hexdump::format_row(row_offset, row));
        }
        Ok(())
    }

    async fn erase(&mut self, block: u32, count: u32) -> Result<(), IO::Error> {
        let geometry = self.device.geometry();
        let blocks = geometry.erase_block_count();
        if block >= blocks || count > blocks - block {
            sayln!(self, "erase range beyond end of device ({} erase blocks)", blocks);
            return Ok(());
        }
        match self.device.erase_blocks(block, count) {
            Ok(()) => sayln!(
                self,
                "erased {} bytes at {:#x}",
                count * geometry.erase_block_size,
                block * geometry.erase_block_size
            ),
            Err(e) => sayln!(self, "error: {}", e),
        }
        Ok(())
    }

    fn write_samples(&mut self) -> Result<usize, F::Error> {
        for (name, contents) in SAMPLE_FILES {
            self.fs.write(name, contents.as_bytes(), WriteMode::Truncate)?;
        }

        self.fs.write(NUMBERS_FILE, &[], WriteMode::Truncate)?;
        for i in 0..NUMBERS_COUNT {
            let mut line: String<16> = String::new();
            let _ = write!(line, "{}\r\n", i);
            self.fs.write(NUMBERS_FILE, line.as_bytes(), WriteMode::Append)?;
        }

        Ok(SAMPLE_FILES.len() + 1)
    }
}
