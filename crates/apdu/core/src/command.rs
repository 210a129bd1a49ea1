//! APDU command definitions
//!
//! This module provides the command envelope as a device receives it,
//! according to ISO/IEC 7816-4. Short (1-byte Lc/Le) and extended
//! (`00 Lc1 Lc2`, 2-byte Le) encodings are both accepted.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::Error;

/// Expected response length (Ne), already decoded: an encoded Le of zero
/// means 256 in the short form and 65536 in the extended form.
pub type ExpectedLength = u32;

const SHORT_MAX_DATA: usize = 0xFF;
const SHORT_MAX_LE: ExpectedLength = 0x100;
const EXTENDED_MAX_LE: ExpectedLength = 0x1_0000;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self::new(cla, ins, p1, p2).with_data(data)
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Command payload, empty when no data field is present
    pub fn payload(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Length of the data field (Lc), zero when absent
    pub fn lc(&self) -> usize {
        self.payload().len()
    }

    /// Whether the command has to be serialized with extended lengths
    fn is_extended(&self) -> bool {
        self.lc() > SHORT_MAX_DATA || self.le.is_some_and(|le| le > SHORT_MAX_LE)
    }

    /// Convert to raw APDU bytes
    pub fn to_bytes(&self) -> Bytes {
        let extended = self.is_extended();
        let mut buffer = BytesMut::with_capacity(4 + 3 + self.lc() + 3);

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        let data = self.payload();
        if !data.is_empty() {
            if extended {
                buffer.put_u8(0x00);
                buffer.put_u16(data.len() as u16);
            } else {
                buffer.put_u8(data.len() as u8);
            }
            buffer.put_slice(data);
        }

        if let Some(le) = self.le {
            if extended {
                // The leading zero is only present when there was no Lc field
                if data.is_empty() {
                    buffer.put_u8(0x00);
                }
                buffer.put_u16(if le >= EXTENDED_MAX_LE { 0 } else { le as u16 });
            } else {
                buffer.put_u8(if le >= SHORT_MAX_LE { 0 } else { le as u8 });
            }
        }

        buffer.freeze()
    }

    /// Parse a command from raw bytes
    pub fn from_bytes(raw: &[u8]) -> Result<Self, Error> {
        if raw.len() < 4 {
            return Err(Error::InvalidCommandLength(raw.len()));
        }

        let mut command = Self::new(raw[0], raw[1], raw[2], raw[3]);
        let body = &raw[4..];
        let invalid = || Error::InvalidCommandLength(raw.len());

        match body {
            // Case 1: header only
            [] => {}
            // Case 2S: short Le only
            [le] => command.le = Some(decode_short_le(*le)),
            // Case 3S / 4S: short Lc, data, optional short Le
            [lc, rest @ ..] if *lc != 0 => {
                let lc = *lc as usize;
                if rest.len() < lc {
                    return Err(invalid());
                }
                let (data, trailer) = rest.split_at(lc);
                command.data = Some(Bytes::copy_from_slice(data));
                match trailer {
                    [] => {}
                    [le] => command.le = Some(decode_short_le(*le)),
                    _ => return Err(invalid()),
                }
            }
            // Case 2E: extended Le only
            [0, hi, lo] => command.le = Some(decode_extended_le(*hi, *lo)),
            // Case 3E / 4E: extended Lc, data, optional extended Le
            [0, hi, lo, rest @ ..] => {
                let lc = u16::from_be_bytes([*hi, *lo]) as usize;
                if lc == 0 || rest.len() < lc {
                    return Err(invalid());
                }
                let (data, trailer) = rest.split_at(lc);
                command.data = Some(Bytes::copy_from_slice(data));
                match trailer {
                    [] => {}
                    [hi, lo] => command.le = Some(decode_extended_le(*hi, *lo)),
                    _ => return Err(invalid()),
                }
            }
            _ => return Err(invalid()),
        }

        trace!(
            cla = format_args!("{:#04x}", command.cla),
            ins = format_args!("{:#04x}", command.ins),
            lc = command.lc(),
            "Parsed APDU command"
        );

        Ok(command)
    }
}

const fn decode_short_le(le: u8) -> ExpectedLength {
    if le == 0 { SHORT_MAX_LE } else { le as ExpectedLength }
}

const fn decode_extended_le(hi: u8, lo: u8) -> ExpectedLength {
    match u16::from_be_bytes([hi, lo]) {
        0 => EXTENDED_MAX_LE,
        le => le as ExpectedLength,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let data = Bytes::from_static(&[0xA0, 0x00, 0x00, 0x01, 0x51, 0x00]);
        let cmd = Command::new_with_data(0x00, 0xA4, 0x04, 0x00, data).with_le(256);
        let bytes = cmd.to_bytes();

        assert_eq!(
            bytes.as_ref(),
            &[0x00, 0xA4, 0x04, 0x00, 0x06, 0xA0, 0x00, 0x00, 0x01, 0x51, 0x00, 0x00]
        );
    }

    #[test]
    fn test_command_serialization_extended() {
        let cmd = Command::new_with_data(0x80, 0x46, 0x00, 0x00, vec![0xAB; 300]);
        let bytes = cmd.to_bytes();

        assert_eq!(&bytes[..7], &[0x80, 0x46, 0x00, 0x00, 0x00, 0x01, 0x2C]);
        assert_eq!(bytes.len(), 7 + 300);
        assert_eq!(Command::from_bytes(&bytes).unwrap(), cmd);
    }

    #[test]
    fn test_command_from_bytes() {
        // Header only
        let cmd = Command::from_bytes(&[0x00, 0x03, 0x00, 0x00]).unwrap();
        assert_eq!((cmd.cla, cmd.ins, cmd.p1, cmd.p2), (0x00, 0x03, 0x00, 0x00));
        assert!(cmd.data.is_none());
        assert!(cmd.le.is_none());

        // Data, no Le
        let cmd = Command::from_bytes(&[0x00, 0x01, 0x03, 0x00, 0x03, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(cmd.payload(), &[0x01, 0x02, 0x03]);
        assert!(cmd.le.is_none());

        // Data and Le
        let cmd =
            Command::from_bytes(&[0x00, 0x01, 0x03, 0x00, 0x03, 0x01, 0x02, 0x03, 0xFF]).unwrap();
        assert_eq!(cmd.payload(), &[0x01, 0x02, 0x03]);
        assert_eq!(cmd.le, Some(0xFF));

        // Short Le of zero means 256
        let cmd = Command::from_bytes(&[0x00, 0xB0, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(cmd.le, Some(256));
        assert_eq!(cmd.lc(), 0);
    }

    #[test]
    fn test_command_from_bytes_extended() {
        // U2F VERSION as sent by browsers: extended Le only
        let cmd = Command::from_bytes(&[0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert!(cmd.data.is_none());
        assert_eq!(cmd.le, Some(65536));

        // Extended Lc with extended Le
        let raw = hex::decode("0001030000000201020000").unwrap();
        let cmd = Command::from_bytes(&raw).unwrap();
        assert_eq!(cmd.payload(), &[0x01, 0x02]);
        assert_eq!(cmd.le, Some(65536));
    }

    #[test]
    fn test_command_from_bytes_malformed() {
        assert_eq!(
            Command::from_bytes(&[0x00, 0x01, 0x00]),
            Err(Error::InvalidCommandLength(3))
        );
        // Lc overruns the buffer
        assert!(Command::from_bytes(&[0x00, 0x01, 0x00, 0x00, 0x05, 0x01]).is_err());
        // Trailing garbage after short Le
        assert!(Command::from_bytes(&[0x00, 0x01, 0x00, 0x00, 0x01, 0xAA, 0x00, 0x00]).is_err());
        // Truncated extended header
        assert!(Command::from_bytes(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x01]).is_err());
    }
}
