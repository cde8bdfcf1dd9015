//! Fixed-capacity accumulator for one in-progress NMEA line

use crate::nmea::protocol::{NMEA_BUFFER_SIZE, NMEA_LINE_TERMINATOR};

/// Result of pushing one byte
#[derive(Debug, PartialEq, Eq)]
pub enum Push<'a> {
    /// Byte stored, line still in progress
    Pending,
    /// Line reached capacity without a terminator and was dropped
    Overflow,
    /// Terminator seen; the completed line without the `\n`
    Line(&'a [u8]),
}

/// Line accumulator with reset-and-drop overflow
///
/// The write position never exceeds [`NMEA_BUFFER_SIZE`]. A line that
/// would fill the buffer is discarded; bytes after it start a fresh line.
#[derive(Debug)]
pub struct LineBuffer {
    buffer: [u8; NMEA_BUFFER_SIZE],
    len: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            buffer: [0; NMEA_BUFFER_SIZE],
            len: 0,
        }
    }

    /// Feed one byte
    pub fn push(&mut self, byte: u8) -> Push<'_> {
        if byte == NMEA_LINE_TERMINATOR {
            let len = std::mem::take(&mut self.len);
            return Push::Line(&self.buffer[..len]);
        }

        self.buffer[self.len] = byte;
        self.len += 1;

        if self.len == NMEA_BUFFER_SIZE {
            self.len = 0;
            return Push::Overflow;
        }

        Push::Pending
    }

    /// Bytes of the line in progress
    pub fn pending(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}
