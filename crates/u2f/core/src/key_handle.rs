//! Key handle encoding.
//!
//! A key handle is `[app id | credential private key | credential public key]`
//! encrypted as a whole under the master wrapping secret. The device keeps no
//! record of issued handles: a presented handle is trusted when it decrypts to
//! the application id of the current request. All wrapping and unwrapping goes
//! through [`KeyWrapper`].

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    config::{IvSource, WrapConfig},
    constants::{APP_ID_SIZE, EC_KEY_SIZE, EC_PUB_KEY_SIZE, KEY_HANDLE_SIZE},
    crypto::{self, CounterBlock},
    secret::MasterSecret,
};

/// Wrapped key handle as handed to relying parties
pub(crate) type WrappedKeyHandle = [u8; KEY_HANDLE_SIZE];

/// Plaintext key handle
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct KeyHandle {
    bytes: [u8; KEY_HANDLE_SIZE],
}

impl KeyHandle {
    pub(crate) fn new(
        app_id: &[u8; APP_ID_SIZE],
        private_key: &[u8; EC_KEY_SIZE],
        public_key: &[u8; EC_PUB_KEY_SIZE],
    ) -> Self {
        let mut bytes = [0u8; KEY_HANDLE_SIZE];
        bytes[..APP_ID_SIZE].copy_from_slice(app_id);
        bytes[APP_ID_SIZE..APP_ID_SIZE + EC_KEY_SIZE].copy_from_slice(private_key);
        bytes[APP_ID_SIZE + EC_KEY_SIZE..].copy_from_slice(public_key);
        Self { bytes }
    }

    pub(crate) fn app_id(&self) -> &[u8] {
        &self.bytes[..APP_ID_SIZE]
    }

    pub(crate) fn private_key(&self) -> [u8; EC_KEY_SIZE] {
        let mut key = [0u8; EC_KEY_SIZE];
        key.copy_from_slice(&self.bytes[APP_ID_SIZE..APP_ID_SIZE + EC_KEY_SIZE]);
        key
    }

    #[cfg(test)]
    pub(crate) fn public_key(&self) -> &[u8] {
        &self.bytes[APP_ID_SIZE + EC_KEY_SIZE..]
    }
}

/// Wraps and unwraps key handles under one master secret
pub(crate) struct KeyWrapper<'a> {
    config: WrapConfig,
    secret: &'a MasterSecret,
}

impl<'a> KeyWrapper<'a> {
    pub(crate) const fn new(config: WrapConfig, secret: &'a MasterSecret) -> Self {
        Self { config, secret }
    }

    fn counter_block(&self) -> CounterBlock {
        let source: &[u8] = match self.config.iv_source {
            IvSource::MasterPublicKey => self.secret.public_key(),
            IvSource::MasterPrivateKey => self.secret.private_key(),
        };
        let mut iv = CounterBlock::default();
        iv.copy_from_slice(&source[..size_of::<CounterBlock>()]);
        iv
    }

    fn apply(&self, data: &mut [u8; KEY_HANDLE_SIZE]) {
        let mut iv = self.counter_block();
        crypto::apply_keystream(self.config.cipher, self.secret.wrapping_secret(), &iv, data);
        iv.zeroize();
    }

    /// Encrypt a plaintext handle
    pub(crate) fn wrap(&self, handle: &KeyHandle) -> WrappedKeyHandle {
        let mut wrapped = handle.bytes;
        self.apply(&mut wrapped);
        wrapped
    }

    /// Decrypt a presented handle, accepting it only if it was issued for
    /// `app_id`
    pub(crate) fn unwrap(
        &self,
        wrapped: &WrappedKeyHandle,
        app_id: &[u8; APP_ID_SIZE],
    ) -> Option<KeyHandle> {
        let mut handle = KeyHandle { bytes: *wrapped };
        self.apply(&mut handle.bytes);
        (handle.app_id() == app_id).then_some(handle)
    }
}
