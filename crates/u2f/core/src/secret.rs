//! Device master secret.
//!
//! Stored as `[EC private key | EC public key | wrapping secret]`. The private
//! key is the attestation key; the wrapping secret keys the key handle cipher.

use p256::ecdsa::SigningKey;
use rand_v8::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{
    Error, Result,
    constants::{EC_KEY_SIZE, EC_PUB_KEY_SIZE, MASTER_SECRET_SIZE, SECRET_KEY_SIZE, object},
    crypto,
    store::{self, Store},
};

#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct MasterSecret {
    private_key: [u8; EC_KEY_SIZE],
    public_key: [u8; EC_PUB_KEY_SIZE],
    wrapping_secret: [u8; SECRET_KEY_SIZE],
}

impl MasterSecret {
    /// Generate a new attestation keypair and wrapping secret
    pub(crate) fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let keypair = crypto::generate_keypair(rng);
        let mut wrapping_secret = [0u8; SECRET_KEY_SIZE];
        crypto::random_bytes(rng, &mut wrapping_secret);

        Self {
            private_key: *keypair.private_key,
            public_key: keypair.public_key,
            wrapping_secret,
        }
    }

    pub(crate) fn from_bytes(bytes: &[u8; MASTER_SECRET_SIZE]) -> Self {
        let (private_key, rest) = bytes.split_at(EC_KEY_SIZE);
        let (public_key, wrapping_secret) = rest.split_at(EC_PUB_KEY_SIZE);

        let mut secret = Self {
            private_key: [0; EC_KEY_SIZE],
            public_key: [0; EC_PUB_KEY_SIZE],
            wrapping_secret: [0; SECRET_KEY_SIZE],
        };
        secret.private_key.copy_from_slice(private_key);
        secret.public_key.copy_from_slice(public_key);
        secret.wrapping_secret.copy_from_slice(wrapping_secret);
        secret
    }

    fn to_bytes(&self) -> Zeroizing<[u8; MASTER_SECRET_SIZE]> {
        let mut bytes = Zeroizing::new([0u8; MASTER_SECRET_SIZE]);
        bytes[..EC_KEY_SIZE].copy_from_slice(&self.private_key);
        bytes[EC_KEY_SIZE..EC_KEY_SIZE + EC_PUB_KEY_SIZE].copy_from_slice(&self.public_key);
        bytes[EC_KEY_SIZE + EC_PUB_KEY_SIZE..].copy_from_slice(&self.wrapping_secret);
        bytes
    }

    pub(crate) fn load<S: Store + ?Sized>(store: &S) -> Result<Self> {
        let bytes = Zeroizing::new(store::read_exact::<S, MASTER_SECRET_SIZE>(
            store,
            object::MASTER_SECRET,
        )?);
        Ok(Self::from_bytes(&bytes))
    }

    pub(crate) fn persist<S: Store + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.write(object::MASTER_SECRET, self.to_bytes().as_slice())?;
        Ok(())
    }

    /// Attestation signing key
    pub(crate) fn attestation_key(&self) -> Result<SigningKey> {
        crypto::signing_key(&self.private_key).ok_or(Error::InvalidMasterSecret)
    }

    pub(crate) const fn private_key(&self) -> &[u8; EC_KEY_SIZE] {
        &self.private_key
    }

    pub(crate) const fn public_key(&self) -> &[u8; EC_PUB_KEY_SIZE] {
        &self.public_key
    }

    pub(crate) const fn wrapping_secret(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.wrapping_secret
    }
}
