//! Helpers for driving a token through raw APDUs.

#![allow(dead_code, unreachable_pub)]

use std::sync::Arc;

use nexum_apdu_core::{Command, Response, StatusWord};
use nexum_u2f::{
    Authenticator, DeviceConfig, PresenceSignal, Provisioning, Store,
    constants::{auth_p1, cla, ins},
};
use p256::ecdsa::{Signature, VerifyingKey, signature::Verifier};
use rand_v8::{SeedableRng, rngs::StdRng};

pub const APP_A: [u8; 32] = [0xA0; 32];
pub const APP_B: [u8; 32] = [0xB0; 32];
pub const CHALLENGE_1: [u8; 32] = [0x11; 32];
pub const CHALLENGE_2: [u8; 32] = [0x22; 32];

/// Opaque certificate blob, long enough to need extended length APDUs
pub fn certificate() -> Vec<u8> {
    let body: Vec<u8> = (0..600u32).map(|i| (i * 37 + 11) as u8).collect();
    let mut cert = vec![0x30, 0x82, (body.len() >> 8) as u8, body.len() as u8];
    cert.extend_from_slice(&body);
    cert
}

pub struct Token<S: Store> {
    pub device: Authenticator<S, StdRng>,
    pub presence: Arc<PresenceSignal>,
}

pub struct Registration {
    pub public_key: Vec<u8>,
    pub key_handle: Vec<u8>,
    pub certificate: Vec<u8>,
    pub signature: Vec<u8>,
}

pub struct Assertion {
    pub flags: u8,
    pub counter: u32,
    pub signature: Vec<u8>,
}

impl<S: Store> Token<S> {
    pub fn new(store: S, seed: u64) -> Self {
        let presence = Arc::new(PresenceSignal::new());
        let device = Authenticator::with_rng(
            store,
            Arc::clone(&presence),
            DeviceConfig::default().with_provisioning(Provisioning::Unlocked),
            StdRng::seed_from_u64(seed),
        );
        Self { device, presence }
    }

    /// Send a command through the raw byte interface
    pub fn send(&mut self, command: &Command) -> Response {
        let raw = self.device.process_bytes(&command.to_bytes()).unwrap();
        Response::from_bytes(&raw).unwrap()
    }

    pub fn personalize(&mut self) -> Vec<u8> {
        let response = self.send(&Command::new(cla::PROVISIONING, ins::PERSONALIZE, 0, 0));
        assert!(response.is_success());
        response.body().to_vec()
    }

    pub fn install_cert(&mut self, cert: &[u8]) -> StatusWord {
        self.send(
            &Command::new_with_data(cla::PROVISIONING, ins::INSTALL_CERT, 0, 0, cert.to_vec())
                .with_le(65536),
        )
        .status()
    }

    pub fn register(&mut self, app_id: &[u8; 32], challenge: &[u8; 32]) -> Response {
        let mut data = challenge.to_vec();
        data.extend_from_slice(app_id);
        self.send(&Command::new_with_data(cla::U2F, ins::REGISTER, 0x03, 0, data).with_le(65536))
    }

    pub fn authenticate(
        &mut self,
        p1: u8,
        app_id: &[u8; 32],
        challenge: &[u8; 32],
        key_handle: &[u8],
    ) -> Response {
        let mut data = challenge.to_vec();
        data.extend_from_slice(app_id);
        data.push(key_handle.len() as u8);
        data.extend_from_slice(key_handle);
        self.send(&Command::new_with_data(cla::U2F, ins::AUTHENTICATE, p1, 0, data).with_le(65536))
    }

    pub fn press(&self) {
        self.presence.assert();
    }

    /// Register with a fresh press and parse the response
    pub fn register_ok(&mut self, app_id: &[u8; 32], challenge: &[u8; 32]) -> Registration {
        self.press();
        let response = self.register(app_id, challenge);
        assert!(response.is_success(), "register failed: {}", response.status());
        parse_registration(response.body(), certificate().len())
    }

    /// Authenticate with a fresh press and parse the response
    pub fn authenticate_ok(
        &mut self,
        app_id: &[u8; 32],
        challenge: &[u8; 32],
        key_handle: &[u8],
    ) -> Assertion {
        self.press();
        let response =
            self.authenticate(auth_p1::ENFORCE_USER_PRESENCE, app_id, challenge, key_handle);
        assert!(response.is_success(), "authenticate failed: {}", response.status());
        parse_assertion(response.body())
    }
}

pub fn parse_registration(body: &[u8], cert_len: usize) -> Registration {
    assert_eq!(body[0], 0x05);
    let public_key = body[1..66].to_vec();
    let handle_len = body[66] as usize;
    let key_handle = body[67..67 + handle_len].to_vec();
    let cert_start = 67 + handle_len;
    Registration {
        public_key,
        key_handle,
        certificate: body[cert_start..cert_start + cert_len].to_vec(),
        signature: body[cert_start + cert_len..].to_vec(),
    }
}

pub fn parse_assertion(body: &[u8]) -> Assertion {
    Assertion {
        flags: body[0],
        counter: u32::from_be_bytes(body[1..5].try_into().unwrap()),
        signature: body[5..].to_vec(),
    }
}

/// Verify a DER signature over `message` with an uncompressed P-256 key
pub fn verifies(public_key: &[u8], message: &[u8], der: &[u8]) -> bool {
    let key = VerifyingKey::from_sec1_bytes(public_key).unwrap();
    let signature = Signature::from_der(der).unwrap();
    key.verify(message, &signature).is_ok()
}

/// Message signed by an authentication response
pub fn assertion_message(app_id: &[u8; 32], flags: u8, counter: u32, challenge: &[u8; 32]) -> Vec<u8> {
    let mut message = app_id.to_vec();
    message.push(flags);
    message.extend_from_slice(&counter.to_be_bytes());
    message.extend_from_slice(challenge);
    message
}
