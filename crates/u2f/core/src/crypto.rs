//! Cryptographic primitives used by the command handlers.
//!
//! P-256 ECDSA over SHA-256 with DER encoded signatures, AES in counter mode
//! for key handle wrapping, and the device random source.

use aes::{Aes128, Aes256};
use cipher::{Iv, Key, KeyIvInit, StreamCipher};
use p256::ecdsa::{Signature, SigningKey, signature::DigestSigner};
use rand_v8::{CryptoRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{
    config::WrapCipher,
    constants::{EC_KEY_SIZE, EC_PUB_KEY_SIZE, POINT_UNCOMPRESSED, SECRET_KEY_SIZE},
};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Initial counter block for the wrapping cipher
pub(crate) type CounterBlock = [u8; 16];

/// Raw P-256 keypair: private scalar and X‖Y public coordinates
pub(crate) struct Keypair {
    pub(crate) private_key: Zeroizing<[u8; EC_KEY_SIZE]>,
    pub(crate) public_key: [u8; EC_PUB_KEY_SIZE],
}

impl Keypair {
    /// Public key in SEC1 uncompressed form (0x04 ‖ X ‖ Y)
    pub(crate) fn uncompressed_public_key(&self) -> [u8; EC_PUB_KEY_SIZE + 1] {
        let mut point = [0u8; EC_PUB_KEY_SIZE + 1];
        point[0] = POINT_UNCOMPRESSED;
        point[1..].copy_from_slice(&self.public_key);
        point
    }
}

/// Generate a fresh P-256 keypair
pub(crate) fn generate_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> Keypair {
    let signing_key = SigningKey::random(rng);
    let point = signing_key.verifying_key().to_encoded_point(false);

    let mut public_key = [0u8; EC_PUB_KEY_SIZE];
    // Skip the SEC1 format byte
    public_key.copy_from_slice(&point.as_bytes()[1..]);

    Keypair {
        private_key: Zeroizing::new(signing_key.to_bytes().into()),
        public_key,
    }
}

/// Load a signing key from a raw private scalar, `None` if it is out of range
pub(crate) fn signing_key(private_key: &[u8; EC_KEY_SIZE]) -> Option<SigningKey> {
    SigningKey::from_bytes(private_key.into()).ok()
}

/// Sign a finished SHA-256 computation, returning the DER encoded signature
pub(crate) fn sign(key: &SigningKey, digest: Sha256) -> Vec<u8> {
    let signature: Signature = key.sign_digest(digest);
    signature.to_der().as_bytes().to_vec()
}

/// Fill `buf` from the device random source
pub(crate) fn random_bytes<R: RngCore + CryptoRng>(rng: &mut R, buf: &mut [u8]) {
    rng.fill_bytes(buf);
}

/// XOR `data` with the counter mode keystream. Encryption and decryption are
/// the same operation.
pub(crate) fn apply_keystream(
    cipher: WrapCipher,
    secret: &[u8; SECRET_KEY_SIZE],
    iv: &CounterBlock,
    data: &mut [u8],
) {
    match cipher {
        WrapCipher::Aes128Ctr => Aes128Ctr::new(
            Key::<Aes128Ctr>::from_slice(&secret[..16]),
            Iv::<Aes128Ctr>::from_slice(iv),
        )
        .apply_keystream(data),
        WrapCipher::Aes256Ctr => Aes256Ctr::new(
            Key::<Aes256Ctr>::from_slice(secret),
            Iv::<Aes256Ctr>::from_slice(iv),
        )
        .apply_keystream(data),
    }
}
