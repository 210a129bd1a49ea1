//! Infrastructure failures of the U2F processor.
//!
//! Protocol outcomes (bad input shape, missing presence, foreign key handles)
//! are never errors: they are answered with a status word. Everything in
//! [`Error`] is a device-internal fault the caller has to surface.

use crate::store::StoreError;

/// Result type for U2F processing
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for U2F processing
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Persistent store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored object does not have the size its layout requires
    #[error("Corrupt object {name}: expected {expected} bytes, found {actual}")]
    CorruptObject {
        /// Logical object name
        name: &'static str,
        /// Required size
        expected: usize,
        /// Size actually read
        actual: usize,
    },

    /// The stored attestation key is not a valid P-256 scalar
    #[error("Invalid master secret: attestation key is not a valid P-256 scalar")]
    InvalidMasterSecret,

    /// The signature counter reached its maximum and cannot advance
    #[error("Signature counter exhausted")]
    CounterExhausted,
}
