//! Constants defined by the FIDO U2F raw message format and this device's
//! provisioning extension.

/// Command classes
pub mod cla {
    /// ISO 7816 class used by all standard U2F commands
    pub const U2F: u8 = 0x00;
    /// Proprietary class reserved for manufacturing-time provisioning
    pub const PROVISIONING: u8 = 0x80;
}

/// Instruction codes
pub mod ins {
    /// U2F_REGISTER
    pub const REGISTER: u8 = 0x01;
    /// U2F_AUTHENTICATE
    pub const AUTHENTICATE: u8 = 0x02;
    /// U2F_VERSION
    pub const VERSION: u8 = 0x03;
    /// Generate and store a fresh device master secret
    pub const PERSONALIZE: u8 = 0x45;
    /// Store the attestation certificate
    pub const INSTALL_CERT: u8 = 0x46;
}

/// Control byte (P1) values for U2F_AUTHENTICATE
pub mod auth_p1 {
    /// Sign only after user presence has been established
    pub const ENFORCE_USER_PRESENCE: u8 = 0x03;
    /// Only check whether the key handle belongs to this device
    pub const CHECK_ONLY: u8 = 0x07;
    /// Sign without requiring user presence
    pub const DONT_ENFORCE_USER_PRESENCE: u8 = 0x08;
}

/// Logical names of the objects kept in the persistent store
pub mod object {
    /// Device master secret
    pub const MASTER_SECRET: &str = "u2f_key";
    /// Attestation certificate
    pub const ATTESTATION_CERT: &str = "u2f_cert";
    /// Signature counter
    pub const COUNTER: &str = "u2f_ctr";
}

/// Application identifier (SHA-256 of the origin)
pub const APP_ID_SIZE: usize = 32;
/// Client challenge (SHA-256 of the client data)
pub const CHALLENGE_SIZE: usize = 32;
/// Raw P-256 private scalar
pub const EC_KEY_SIZE: usize = 32;
/// Raw P-256 public key, X followed by Y
pub const EC_PUB_KEY_SIZE: usize = 64;
/// Symmetric key handle wrapping secret
pub const SECRET_KEY_SIZE: usize = 32;
/// Key handle: app id, credential private key, credential public key
pub const KEY_HANDLE_SIZE: usize = APP_ID_SIZE + EC_KEY_SIZE + EC_PUB_KEY_SIZE;
/// Device master secret: EC private key, EC public key, wrapping secret
pub const MASTER_SECRET_SIZE: usize = EC_KEY_SIZE + EC_PUB_KEY_SIZE + SECRET_KEY_SIZE;
/// Signature counter as stored
pub const COUNTER_SIZE: usize = 4;
/// Largest attestation certificate accepted
pub const MAX_ATT_CERT_SIZE: usize = 2048;

/// Register request payload: challenge followed by application id
pub const REGISTER_REQUEST_SIZE: usize = CHALLENGE_SIZE + APP_ID_SIZE;
/// Reserved first byte of a register response
pub const REGISTER_ID: u8 = 0x05;
/// Reserved byte prefixed to the data signed at registration
pub const REGISTER_HASH_ID: u8 = 0x00;
/// SEC1 uncompressed point marker
pub const POINT_UNCOMPRESSED: u8 = 0x04;
/// User presence bit in the authentication flags
pub const AUTH_FLAG_TUP: u8 = 0x01;

/// Protocol version string returned by U2F_VERSION
pub const VERSION: &[u8; 6] = b"U2F_V2";
