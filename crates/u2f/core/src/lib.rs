//! FIDO U2F command processor for hardware security tokens.
//!
//! [`Authenticator`] turns U2F command APDUs into registration and
//! authentication responses. The token is stateless with respect to
//! credentials: each credential keypair travels inside its key handle,
//! encrypted under a device-wide wrapping secret, and is recovered when the
//! relying party presents the handle again.
//!
//! The surrounding device supplies three things:
//!
//! - a [`Store`] holding the master secret, the attestation certificate and
//!   the signature counter
//! - a shared [`PresenceSignal`], asserted from the button or touch handler
//! - a [`DeviceConfig`] selecting the transport, the provisioning capability
//!   and the key handle wrapping parameters
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use nexum_apdu_core::Command;
//! use nexum_u2f::{Authenticator, DeviceConfig, PresenceSignal, store::MemoryStore};
//!
//! let presence = Arc::new(PresenceSignal::new());
//! let mut token = Authenticator::new(MemoryStore::new(), presence.clone(), DeviceConfig::default());
//!
//! let response = token.process(&Command::new(0x00, 0x03, 0x00, 0x00))?;
//! assert_eq!(response.body(), b"U2F_V2");
//! # Ok::<(), nexum_u2f::Error>(())
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod authenticator;
mod commands;
pub mod config;
pub mod constants;
mod counter;
mod crypto;
mod error;
mod key_handle;
mod presence;
mod secret;
pub mod store;

#[cfg(test)]
mod testing;

pub use authenticator::Authenticator;
pub use config::{DeviceConfig, IvSource, Provisioning, Transport, WrapCipher, WrapConfig};
pub use error::{Error, Result};
pub use presence::PresenceSignal;
pub use store::{FileStore, MemoryStore, Store, StoreError};
