//! Console command parsing

use core::fmt;

/// Bytes `xxd` dumps when no length is given
pub const XXD_DEFAULT_LEN: u32 = 64;

/// Most bytes one `xxd` will dump
pub const XXD_MAX_LEN: u32 = 512;

/// A parsed console command, borrowing from the input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Blank line
    Empty,
    Help,
    /// Show block device geometry
    Lsblk,
    Mount,
    Umount,
    Ls(&'a str),
    Mkdir(&'a str),
    Cat(&'a str),
    /// Create or truncate a file with `text`
    Write { path: &'a str, text: &'a str },
    /// Create or extend a file with `text`
    Append { path: &'a str, text: &'a str },
    Rm(&'a str),
    /// Hex dump of the raw block device
    Xxd { offset: u32, len: u32 },
    /// Erase raw erase blocks, bypassing the filesystem
    Erase { block: u32, count: u32 },
    /// Create a set of sample files
    Samples,
    /// Toggle echoing of parsed commands
    Dbg,
    Format,
}

/// Why a line could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError<'a> {
    UnknownCommand(&'a str),
    /// Required argument missing; carries the usage string
    Usage(&'static str),
    InvalidNumber(&'a str),
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownCommand(name) => write!(f, "unknown command: {}", name),
            ParseError::Usage(usage) => write!(f, "usage: {}", usage),
            ParseError::InvalidNumber(s) => write!(f, "invalid number: {}", s),
        }
    }
}

/// Name and usage of every command, for `help`
pub const COMMANDS: &[(&str, &str)] = &[
    ("help", "show this list"),
    ("lsblk", "show block device geometry"),
    ("mount", "mount the FAT volume"),
    ("umount", "unmount the FAT volume"),
    ("ls [path]", "list a directory"),
    ("mkdir <path>", "create a directory"),
    ("cat <path>", "print a file"),
    ("write <path> <text...>", "replace a file with text"),
    ("append <path> <text...>", "add text to the end of a file"),
    ("rm <path>", "delete a file"),
    ("xxd <offset> [length]", "hex dump of the raw device"),
    ("erase <block> [count]", "erase raw erase blocks"),
    ("samples", "create sample files"),
    ("dbg", "toggle command debugging"),
    ("format", "format the volume"),
];

/// Split off the first whitespace-delimited word
fn next_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

/// Parse a decimal or `0x`-prefixed hex number
pub fn parse_number(s: &str) -> Option<u32> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Result<Self, ParseError<'a>> {
        let (name, rest) = next_word(line);
        let (arg, text) = next_word(rest);
        let required = |usage: &'static str| {
            if arg.is_empty() {
                Err(ParseError::Usage(usage))
            } else {
                Ok(arg)
            }
        };

        let command = match name {
            "" => Command::Empty,
            "help" | "?" => Command::Help,
            "lsblk" => Command::Lsblk,
            "mount" => Command::Mount,
            "umount" => Command::Umount,
            "ls" => Command::Ls(if arg.is_empty() { "/" } else { arg }),
            "mkdir" => Command::Mkdir(required("mkdir <path>")?),
            "cat" => Command::Cat(required("cat <path>")?),
            "write" => Command::Write {
                path: required("write <path> <text...>")?,
                text,
            },
            "append" => Command::Append {
                path: required("append <path> <text...>")?,
                text,
            },
            "rm" => Command::Rm(required("rm <path>")?),
            "xxd" => {
                let offset = required("xxd <offset> [length]")?;
                let offset = parse_number(offset).ok_or(ParseError::InvalidNumber(offset))?;
                let (len, _) = next_word(text);
                let len = if len.is_empty() {
                    XXD_DEFAULT_LEN
                } else {
                    parse_number(len).ok_or(ParseError::InvalidNumber(len))?
                };
                Command::Xxd {
                    offset,
                    len: len.min(XXD_MAX_LEN),
                }
            }
            "erase" => {
                let block = required("erase <block> [count]")?;
                let block = parse_number(block).ok_or(ParseError::InvalidNumber(block))?;
                let (count, _) = next_word(text);
                let count = if count.is_empty() {
                    1
                } else {
                    match parse_number(count) {
                        Some(n) if n > 0 => n,
                        _ => return Err(ParseError::InvalidNumber(count)),
                    }
                };
                Command::Erase { block, count }
            }
            "samples" => Command::Samples,
            "dbg" => Command::Dbg,
            "format" => Command::Format,
            other => return Err(ParseError::UnknownCommand(other)),
        };
        Ok(command)
    }
}
