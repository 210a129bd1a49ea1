//! Fixtures shared by the unit tests.

use std::{io, sync::Arc};

use nexum_apdu_core::Command;
use rand_v8::{SeedableRng, rngs::StdRng};

use crate::{
    Authenticator, PresenceSignal,
    config::{DeviceConfig, Provisioning},
    constants::{APP_ID_SIZE, CHALLENGE_SIZE, KEY_HANDLE_SIZE, cla, ins},
    key_handle::WrappedKeyHandle,
    store::{MemoryStore, Store, StoreError},
};

pub(crate) const APP_ID: [u8; APP_ID_SIZE] = [0x0A; APP_ID_SIZE];
pub(crate) const CHALLENGE: [u8; CHALLENGE_SIZE] = [0xC1; CHALLENGE_SIZE];
pub(crate) const CERT: &[u8] = b"\x30\x82\x01\x00attestation certificate";

pub(crate) type TestDevice = Authenticator<MemoryStore, StdRng>;

/// Memory store whose writes to one object fail with an I/O error
#[derive(Debug)]
pub(crate) struct FailingWrites {
    pub(crate) inner: MemoryStore,
    pub(crate) name: &'static str,
}

impl Store for FailingWrites {
    fn read(&self, name: &str, buf: &mut [u8]) -> Result<usize, StoreError> {
        self.inner.read(name, buf)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        if name == self.name {
            return Err(StoreError::Io {
                name: name.to_owned(),
                source: io::Error::other("write failed"),
            });
        }
        self.inner.write(name, data)
    }
}

/// Move a device onto a store that refuses writes to `name`
pub(crate) fn failing_writes(
    device: TestDevice,
    name: &'static str,
) -> Authenticator<FailingWrites, StdRng> {
    Authenticator {
        store: FailingWrites {
            inner: device.store,
            name,
        },
        presence: device.presence,
        config: device.config,
        rng: device.rng,
    }
}

pub(crate) fn device(config: DeviceConfig) -> TestDevice {
    Authenticator::with_rng(
        MemoryStore::new(),
        Arc::new(PresenceSignal::new()),
        config,
        StdRng::seed_from_u64(0x5eed),
    )
}

/// Personalized device with a certificate installed and provisioning still
/// unlocked
pub(crate) fn provisioned_device() -> TestDevice {
    let mut device = device(DeviceConfig::default().with_provisioning(Provisioning::Unlocked));
    let response = device
        .process(&Command::new(cla::PROVISIONING, ins::PERSONALIZE, 0, 0))
        .unwrap();
    assert!(response.is_success());
    let response = device
        .process(&Command::new_with_data(
            cla::PROVISIONING,
            ins::INSTALL_CERT,
            0,
            0,
            CERT,
        ))
        .unwrap();
    assert!(response.is_success());
    device
}

pub(crate) fn register_command(
    app_id: &[u8; APP_ID_SIZE],
    challenge: &[u8; CHALLENGE_SIZE],
) -> Command {
    let mut data = Vec::with_capacity(CHALLENGE_SIZE + APP_ID_SIZE);
    data.extend_from_slice(challenge);
    data.extend_from_slice(app_id);
    Command::new_with_data(cla::U2F, ins::REGISTER, 0x00, 0x00, data)
}

pub(crate) fn authenticate_command(
    p1: u8,
    app_id: &[u8; APP_ID_SIZE],
    key_handle: &[u8; KEY_HANDLE_SIZE],
) -> Command {
    let mut data = Vec::with_capacity(CHALLENGE_SIZE + APP_ID_SIZE + 1 + KEY_HANDLE_SIZE);
    data.extend_from_slice(&CHALLENGE);
    data.extend_from_slice(app_id);
    data.push(KEY_HANDLE_SIZE as u8);
    data.extend_from_slice(key_handle);
    Command::new_with_data(cla::U2F, ins::AUTHENTICATE, p1, 0x00, data)
}

/// Provisioned device with one credential registered for [`APP_ID`].
/// Returns the device, the key handle and the uncompressed public key.
pub(crate) fn registered() -> (TestDevice, WrappedKeyHandle, Vec<u8>) {
    let mut device = provisioned_device();
    device.presence().assert();
    let response = device.process(&register_command(&APP_ID, &CHALLENGE)).unwrap();
    assert!(response.is_success());

    let body = response.body();
    let public_key = body[1..66].to_vec();
    let key_handle = body[67..67 + KEY_HANDLE_SIZE].try_into().unwrap();
    (device, key_handle, public_key)
}
