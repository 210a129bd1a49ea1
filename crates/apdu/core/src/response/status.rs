//! Status word definitions for APDU responses

use std::fmt;

use tracing::Level;

/// Status Word (SW1-SW2) of an APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Create from a u16 value (SW1 | SW2)
    pub const fn from_u16(status: u16) -> Self {
        Self {
            sw1: (status >> 8) as u8,
            sw2: status as u8,
        }
    }

    /// Convert to a u16 value (SW1 | SW2)
    pub const fn to_u16(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Check if this status word indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Get the appropriate tracing level for this status word.
    ///
    /// "Conditions not satisfied" is what a host sees while it polls for user
    /// interaction, so it is logged like a success.
    pub const fn tracing_level(&self) -> Level {
        match (self.sw1, self.sw2) {
            (0x90, 0x00) | (0x69, 0x85) => Level::DEBUG,
            _ => Level::WARN,
        }
    }

    /// Get a description of this status word
    pub const fn description(&self) -> &'static str {
        match (self.sw1, self.sw2) {
            (0x90, 0x00) => "Success",
            (0x65, 0x81) => "Memory failure",
            (0x67, 0x00) => "Wrong length",
            (0x69, 0x82) => "Security status not satisfied",
            (0x69, 0x85) => "Conditions of use not satisfied",
            (0x6A, 0x80) => "Incorrect parameters in the data field",
            (0x6A, 0x86) => "Incorrect parameters P1-P2",
            (0x6D, 0x00) => "Instruction code not supported or invalid",
            (0x6E, 0x00) => "Class not supported",
            (0x6F, 0x00) => "No precise diagnosis",
            _ => "Unknown status word",
        }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from(tuple: (u8, u8)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<u16> for StatusWord {
    fn from(status: u16) -> Self {
        Self::from_u16(status)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1, self.sw2)
    }
}

/// No error (90 00)
pub const NO_ERROR: StatusWord = StatusWord::new(0x90, 0x00);

/// Wrong length (67 00)
pub const WRONG_LENGTH: StatusWord = StatusWord::new(0x67, 0x00);

/// Conditions of use not satisfied (69 85)
pub const CONDITIONS_NOT_SATISFIED: StatusWord = StatusWord::new(0x69, 0x85);

/// Incorrect parameters in the data field (6A 80)
pub const WRONG_DATA: StatusWord = StatusWord::new(0x6A, 0x80);

/// Incorrect parameters P1-P2 (6A 86)
pub const WRONG_P1P2: StatusWord = StatusWord::new(0x6A, 0x86);

/// Instruction not supported (6D 00)
pub const INS_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6D, 0x00);

/// Class not supported (6E 00)
pub const CLA_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6E, 0x00);
