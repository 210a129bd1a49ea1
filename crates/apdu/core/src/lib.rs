//! Core types for APDU (Application Protocol Data Unit) operations
//!
//! This crate provides the envelope types exchanged with a smart card style
//! device according to ISO/IEC 7816-4:
//!
//! - [`Command`]: a parsed command APDU (CLA, INS, P1, P2, data, Le)
//! - [`Response`]: a response payload plus its [`StatusWord`]
//! - [`status`]: the status words a device answers with
//!
//! Both short and extended length encodings are understood, so payloads larger
//! than 255 bytes (attestation certificates, registration responses) can be
//! carried without chaining.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod error;
pub mod response;

pub use command::{Command, ExpectedLength};
pub use error::Error;
pub use response::Response;
pub use response::status::{self, StatusWord};

/// Prelude module containing commonly used types
pub mod prelude {
    pub use crate::{Bytes, BytesMut, Error};

    pub use crate::Command;
    pub use crate::command::ExpectedLength;

    pub use crate::Response;
    pub use crate::response::status::{self, StatusWord};
}
