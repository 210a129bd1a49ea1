//! Command handlers, one per supported instruction.
//!
//! Each handler validates the input shape itself and answers protocol
//! outcomes with a status word.

pub(crate) mod authenticate;
pub(crate) mod install_cert;
pub(crate) mod personalize;
pub(crate) mod register;
pub(crate) mod version;
