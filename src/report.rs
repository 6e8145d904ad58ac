//! Fixed layout of the IO pin reports exchanged with the IOWarrior40.
//!
//! A report is a report ID followed by a 32-bit little-endian value. Byte `n` of
//! that value holds the pins of port `n`.

use crate::consts::{REPORT_DATA_SIZE, REPORT_ID_IO, REPORT_SIZE};

/// One of the four 8-bit ports of the IOWarrior40.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    /// Buttons and control lines.
    P0 = 0,
    P1 = 1,
    P2 = 2,
    /// LEDs on the base board.
    P3 = 3,
}

impl Port {
    /// Byte index of this port inside the report value.
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// A 4-byte IO pin report plus its report ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Report {
    pub id: u8,
    pub value: u32,
}

impl Report {
    /// Creates a plain IO report (report ID 0) holding `value`.
    pub fn new(value: u32) -> Self {
        Report {
            id: REPORT_ID_IO,
            value,
        }
    }

    /// The four port bytes, port 0 first.
    #[inline]
    pub fn bytes(&self) -> [u8; REPORT_DATA_SIZE] {
        self.value.to_le_bytes()
    }

    #[inline]
    pub fn byte(&self, port: Port) -> u8 {
        self.bytes()[port.index()]
    }

    /// Replaces the pins of one port, leaving the others untouched.
    pub fn set_byte(&mut self, port: Port, byte: u8) {
        let mut bytes = self.bytes();
        bytes[port.index()] = byte;
        self.value = u32::from_le_bytes(bytes);
    }

    /// Wire form: report ID followed by ports 0-3.
    pub fn to_wire(&self) -> [u8; REPORT_SIZE] {
        let mut buf = [0u8; REPORT_SIZE];
        buf[0] = self.id;
        buf[1..].copy_from_slice(&self.bytes());
        buf
    }

    /// Parses a wire buffer. Returns `None` unless it holds a full report.
    pub fn from_wire(buf: &[u8]) -> Option<Self> {
        if buf.len() < REPORT_SIZE {
            return None;
        }
        let value = u32::from_le_bytes([buf[1], buf[2], buf[3], buf[4]]);
        Some(Report { id: buf[0], value })
    }
}
