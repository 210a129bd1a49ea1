//! Error type for APDU framing

/// Errors raised while encoding or decoding APDU envelopes
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The command bytes do not form a valid short or extended APDU
    #[error("Invalid command length: {0} bytes")]
    InvalidCommandLength(usize),

    /// The response is too short to carry a status word
    #[error("Invalid response length: {0} bytes")]
    InvalidResponseLength(usize),
}
