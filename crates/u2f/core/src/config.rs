//! Device configuration.
//!
//! Everything here is plain data so a host can load it from a file; the
//! dispatcher only reads it.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Transport the command messages arrive over
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// USB HID; presence comes from a physical button
    #[default]
    #[display("usb")]
    Usb,
    /// Contactless; bringing the token into the field counts as presence
    #[display("nfc")]
    Nfc,
}

impl Transport {
    /// Whether presence is asserted implicitly by the transport itself
    pub const fn implies_presence(&self) -> bool {
        matches!(self, Self::Nfc)
    }
}

/// Whether the manufacturing commands (class `0x80`) are reachable
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provisioning {
    /// Provisioning commands answer "class not supported"
    #[default]
    #[display("locked")]
    Locked,
    /// Provisioning commands are dispatched
    #[display("unlocked")]
    Unlocked,
}

/// Block cipher used in counter mode to wrap key handles
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapCipher {
    /// AES-128-CTR keyed with the first 16 bytes of the wrapping secret
    #[default]
    #[display("aes128-ctr")]
    Aes128Ctr,
    /// AES-256-CTR keyed with the whole wrapping secret
    #[display("aes256-ctr")]
    Aes256Ctr,
}

/// Stored key material used as the initial counter block
///
/// Neither choice is a per-handle nonce: every handle issued under one master
/// secret shares the same keystream. Kept for compatibility with handles
/// already held by relying parties.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IvSource {
    /// First 16 bytes of the stored EC public key
    #[default]
    #[display("master-public-key")]
    MasterPublicKey,
    /// First 16 bytes of the stored EC private key
    #[display("master-private-key")]
    MasterPrivateKey,
}

/// Key handle wrapping parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapConfig {
    /// Cipher
    pub cipher: WrapCipher,
    /// Counter block source
    pub iv_source: IvSource,
}

/// Configuration for an [`Authenticator`](crate::Authenticator)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Transport in use
    pub transport: Transport,
    /// Initial provisioning capability
    pub provisioning: Provisioning,
    /// Key handle wrapping parameters
    pub wrap: WrapConfig,
}

impl DeviceConfig {
    /// Set the transport
    pub const fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Set the provisioning capability
    pub const fn with_provisioning(mut self, provisioning: Provisioning) -> Self {
        self.provisioning = provisioning;
        self
    }

    /// Set the wrapping parameters
    pub const fn with_wrap(mut self, wrap: WrapConfig) -> Self {
        self.wrap = wrap;
        self
    }
}
