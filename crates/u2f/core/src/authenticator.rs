//! Command dispatcher.
//!
//! Routes an inbound command to its handler by class, then instruction, and
//! returns the handler's response unchanged.

use std::sync::Arc;

use bytes::Bytes;
use nexum_apdu_core::{Command, Response, status};
use rand_v8::{CryptoRng, RngCore, rngs::OsRng};
use tracing::{Level, debug, info, warn};

use crate::{
    Result,
    commands::{authenticate, install_cert, personalize, register, version},
    config::{DeviceConfig, Provisioning},
    constants::{cla, ins},
    presence::PresenceSignal,
    store::Store,
};

/// U2F token: the store, the presence signal and the configuration a command
/// is processed against
#[derive(Debug)]
pub struct Authenticator<S, R = OsRng> {
    pub(crate) store: S,
    pub(crate) presence: Arc<PresenceSignal>,
    pub(crate) config: DeviceConfig,
    pub(crate) rng: R,
}

impl<S: Store> Authenticator<S, OsRng> {
    /// Create an authenticator drawing randomness from the operating system
    pub fn new(store: S, presence: Arc<PresenceSignal>, config: DeviceConfig) -> Self {
        Self::with_rng(store, presence, config, OsRng)
    }
}

impl<S: Store, R: RngCore + CryptoRng> Authenticator<S, R> {
    /// Create an authenticator with an explicit random source
    pub const fn with_rng(
        store: S,
        presence: Arc<PresenceSignal>,
        config: DeviceConfig,
        rng: R,
    ) -> Self {
        Self {
            store,
            presence,
            config,
            rng,
        }
    }

    /// Process one command.
    ///
    /// Protocol outcomes are reported through the response status word;
    /// `Err` is reserved for store failures and corrupt persistent state.
    pub fn process(&mut self, command: &Command) -> Result<Response> {
        debug!(
            cla = format_args!("{:#04x}", command.cla),
            ins = format_args!("{:#04x}", command.ins),
            p1 = format_args!("{:#04x}", command.p1),
            lc = command.lc(),
            "Dispatching command"
        );

        let response = match (command.cla, self.config.provisioning) {
            (cla::U2F, _) => match command.ins {
                ins::REGISTER => register::handle(self, command)?,
                ins::AUTHENTICATE => authenticate::handle(self, command)?,
                ins::VERSION => version::handle(command),
                _ => Response::error(status::INS_NOT_SUPPORTED),
            },
            (cla::PROVISIONING, Provisioning::Unlocked) => match command.ins {
                ins::PERSONALIZE => personalize::handle(self, command)?,
                ins::INSTALL_CERT => install_cert::handle(self, command)?,
                _ => Response::error(status::INS_NOT_SUPPORTED),
            },
            _ => Response::error(status::CLA_NOT_SUPPORTED),
        };

        let sw = response.status();
        if sw.tracing_level() == Level::WARN {
            warn!(status = %sw, reason = sw.description(), "Command rejected");
        } else {
            debug!(status = %sw, len = response.body().len(), "Command answered");
        }

        Ok(response)
    }

    /// Process a raw command APDU, returning the raw response APDU.
    ///
    /// Bytes that do not frame a valid APDU are answered with "wrong length".
    pub fn process_bytes(&mut self, raw: &[u8]) -> Result<Bytes> {
        let response = match Command::from_bytes(raw) {
            Ok(command) => self.process(&command)?,
            Err(e) => {
                warn!(error = %e, "Malformed command APDU");
                Response::error(status::WRONG_LENGTH)
            }
        };
        Ok(response.to_bytes())
    }

    /// Permanently disable the provisioning commands for this instance
    pub fn lock_provisioning(&mut self) {
        if self.config.provisioning == Provisioning::Unlocked {
            info!("Provisioning locked");
        }
        self.config.provisioning = Provisioning::Locked;
    }

    /// Whether presence is established for the current command
    pub(crate) fn user_present(&self) -> bool {
        self.config.transport.implies_presence() || self.presence.is_asserted()
    }

    /// Consume the presence assertion after a successful command
    pub(crate) fn consume_presence(&self) {
        self.presence.clear();
    }
}

impl<S, R> Authenticator<S, R> {
    /// Current provisioning capability
    pub const fn provisioning(&self) -> Provisioning {
        self.config.provisioning
    }

    /// Device configuration
    pub const fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Presence signal handle, to be shared with the interaction context
    pub const fn presence(&self) -> &Arc<PresenceSignal> {
        &self.presence
    }

    /// Persistent store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the persistent store
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the authenticator and return its store
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{device, provisioned_device};

    #[test]
    fn test_unknown_instruction() {
        let mut device = provisioned_device();
        let response = device.process(&Command::new(0x00, 0x10, 0, 0)).unwrap();
        assert_eq!(response.status(), status::INS_NOT_SUPPORTED);
        assert!(response.payload().is_none());

        let response = device.process(&Command::new(0x80, 0x10, 0, 0)).unwrap();
        assert_eq!(response.status(), status::INS_NOT_SUPPORTED);
    }

    #[test]
    fn test_unknown_class() {
        let mut device = provisioned_device();
        for cla in [0x01, 0x84, 0xFF] {
            let response = device.process(&Command::new(cla, 0x01, 0, 0)).unwrap();
            assert_eq!(response.status(), status::CLA_NOT_SUPPORTED);
            assert!(response.payload().is_none());
        }
    }

    #[test]
    fn test_locked_provisioning_hides_class() {
        let mut device = device(DeviceConfig::default());
        assert_eq!(device.provisioning(), Provisioning::Locked);

        let response = device.process(&Command::new(0x80, ins::PERSONALIZE, 0, 0)).unwrap();
        assert_eq!(response.status(), status::CLA_NOT_SUPPORTED);
        assert!(device.store().get(crate::constants::object::MASTER_SECRET).is_none());
    }

    #[test]
    fn test_lock_provisioning_is_one_way() {
        let mut device = provisioned_device();
        device.lock_provisioning();
        device.lock_provisioning();
        assert_eq!(device.provisioning(), Provisioning::Locked);

        let response = device
            .process(&Command::new(0x80, ins::INSTALL_CERT, 0, 0).with_data(&b"cert"[..]))
            .unwrap();
        assert_eq!(response.status(), status::CLA_NOT_SUPPORTED);
    }

    #[test]
    fn test_process_bytes() {
        let mut device = provisioned_device();
        let response = device.process_bytes(&[0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(response.as_ref(), b"U2F_V2\x90\x00");

        let response = device.process_bytes(&[0x00, 0x03]).unwrap();
        assert_eq!(response.as_ref(), &[0x67, 0x00]);
    }
}
