//! Line editing for a serial terminal
//!
//! Bytes arrive one at a time. Printable ASCII is buffered and echoed,
//! backspace and DEL erase, and CR or LF completes the line. A LF that
//! directly follows a CR is swallowed so CRLF terminals submit once.

use heapless::String;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;
const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// What the terminal should see after feeding a byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Nothing to echo
    Nothing,
    /// Echo this byte
    Echo(u8),
    /// Erase the last character on screen
    Erase,
    /// A line is complete; fetch it with `take`
    Line,
}

/// Single-line editor with a fixed capacity
#[derive(Debug, Default)]
pub struct LineEditor<const N: usize> {
    buf: String<N>,
    last_was_cr: bool,
}

impl<const N: usize> LineEditor<N> {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            last_was_cr: false,
        }
    }

    /// Characters typed so far
    pub fn pending(&self) -> &str {
        &self.buf
    }

    pub fn feed(&mut self, byte: u8) -> Feed {
        let after_cr = core::mem::replace(&mut self.last_was_cr, byte == CR);

        match byte {
            CR => Feed::Line,
            LF if after_cr => Feed::Nothing,
            LF => Feed::Line,
            BACKSPACE | DELETE => {
                if self.buf.pop().is_some() {
                    Feed::Erase
                } else {
                    Feed::Nothing
                }
            }
            0x20..=0x7E => {
                // Full buffer drops input rather than submitting early
                if self.buf.push(byte as char).is_ok() {
                    Feed::Echo(byte)
                } else {
                    Feed::Nothing
                }
            }
            _ => Feed::Nothing,
        }
    }

    /// Hand over the completed line and start a new one
    pub fn take(&mut self) -> String<N> {
        core::mem::take(&mut self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed_all<const N: usize>(editor: &mut LineEditor<N>, input: &[u8]) -> std::vec::Vec<Feed> {
        input.iter().map(|&b| editor.feed(b)).collect()
    }

    #[test]
    fn test_simple_line() {
        let mut editor = LineEditor::<32>::new();
        let feeds = feed_all(&mut editor, b"ls\r");
        assert_eq!(feeds, [Feed::Echo(b'l'), Feed::Echo(b's'), Feed::Line]);
        assert_eq!(editor.take().as_str(), "ls");
        assert_eq!(editor.pending(), "");
    }

    #[test]
    fn test_crlf_submits_once() {
        let mut editor = LineEditor::<32>::new();
        let feeds = feed_all(&mut editor, b"a\r\nb\n");
        assert_eq!(
            feeds,
            [
                Feed::Echo(b'a'),
                Feed::Line,
                Feed::Nothing,
                Feed::Echo(b'b'),
                Feed::Line
            ]
        );
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut editor = LineEditor::<32>::new();
        feed_all(&mut editor, b"catt");
        assert_eq!(editor.feed(BACKSPACE), Feed::Erase);
        feed_all(&mut editor, b"x");
        assert_eq!(editor.feed(DELETE), Feed::Erase);
        assert_eq!(editor.pending(), "cat");
    }

    #[test]
    fn test_erase_on_empty_line_does_nothing() {
        let mut editor = LineEditor::<8>::new();
        assert_eq!(editor.feed(DELETE), Feed::Nothing);
    }

    #[test]
    fn test_overflow_drops_input() {
        let mut editor = LineEditor::<4>::new();
        let feeds = feed_all(&mut editor, b"abcdef");
        assert_eq!(feeds[4], Feed::Nothing);
        assert_eq!(editor.pending(), "abcd");
    }

    #[test]
    fn test_control_bytes_ignored() {
        let mut editor = LineEditor::<8>::new();
        assert_eq!(editor.feed(0x1B), Feed::Nothing);
        assert_eq!(editor.feed(0x00), Feed::Nothing);
        assert_eq!(editor.pending(), "");
    }

    proptest! {
        #[test]
        fn prop_printable_input_round_trips(s in "[ -~]{0,32}") {
            let mut editor = LineEditor::<64>::new();
            for b in s.bytes() {
                prop_assert_eq!(editor.feed(b), Feed::Echo(b));
            }
            prop_assert_eq!(editor.feed(b'\r'), Feed::Line);
            let line = editor.take();
            prop_assert_eq!(line.as_str(), s.as_str());
        }

        #[test]
        fn prop_never_exceeds_capacity(input in proptest::collection::vec(any::<u8>(), 0..200)) {
            let mut editor = LineEditor::<16>::new();
            for b in input {
                editor.feed(b);
                prop_assert!(editor.pending().len() <= 16);
            }
        }
    }
}
