//! U2F_REGISTER
//!
//! Request: `challenge (32) | application (32)`.
//!
//! Response: `0x05 | public key (65) | key handle length (1) | key handle |
//! attestation certificate | signature`, where the signature is made with the
//! attestation key over `0x00 | application | challenge | key handle |
//! public key`.

use bytes::{BufMut, BytesMut};
use nexum_apdu_core::{Command, Response, status};
use rand_v8::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::{
    Authenticator, Result,
    constants::{
        APP_ID_SIZE, CHALLENGE_SIZE, KEY_HANDLE_SIZE, MAX_ATT_CERT_SIZE, REGISTER_HASH_ID,
        REGISTER_ID, REGISTER_REQUEST_SIZE, object,
    },
    crypto,
    key_handle::{KeyHandle, KeyWrapper},
    secret::MasterSecret,
    store::Store,
};

struct RegisterRequest<'a> {
    challenge: &'a [u8; CHALLENGE_SIZE],
    app_id: &'a [u8; APP_ID_SIZE],
}

impl<'a> TryFrom<&'a [u8]> for RegisterRequest<'a> {
    type Error = usize;

    fn try_from(data: &'a [u8]) -> std::result::Result<Self, usize> {
        if data.len() != REGISTER_REQUEST_SIZE {
            return Err(data.len());
        }
        let (challenge, rest) = data.split_first_chunk().ok_or(data.len())?;
        let app_id = rest.first_chunk().ok_or(data.len())?;
        Ok(Self { challenge, app_id })
    }
}

fn read_certificate<S: Store + ?Sized>(store: &S) -> Result<Vec<u8>> {
    let mut cert = vec![0u8; MAX_ATT_CERT_SIZE];
    let len = store.read(object::ATTESTATION_CERT, &mut cert)?;
    cert.truncate(len);
    Ok(cert)
}

pub(crate) fn handle<S: Store, R: RngCore + CryptoRng>(
    device: &mut Authenticator<S, R>,
    command: &Command,
) -> Result<Response> {
    let request = match RegisterRequest::try_from(command.payload()) {
        Ok(request) => request,
        Err(len) => {
            debug!(len, "Register request has wrong length");
            return Ok(Response::error(status::WRONG_LENGTH));
        }
    };

    if !device.user_present() {
        return Ok(Response::error(status::CONDITIONS_NOT_SATISFIED));
    }

    let secret = MasterSecret::load(&device.store)?;
    let attestation_key = secret.attestation_key()?;
    let cert = read_certificate(&device.store)?;

    let credential = crypto::generate_keypair(&mut device.rng);
    let handle = KeyHandle::new(request.app_id, &credential.private_key, &credential.public_key);
    let key_handle = KeyWrapper::new(device.config.wrap, &secret).wrap(&handle);
    let public_key = credential.uncompressed_public_key();

    let mut digest = Sha256::new();
    digest.update([REGISTER_HASH_ID]);
    digest.update(request.app_id);
    digest.update(request.challenge);
    digest.update(key_handle);
    digest.update(public_key);
    let signature = crypto::sign(&attestation_key, digest);

    let mut body = BytesMut::with_capacity(
        1 + public_key.len() + 1 + KEY_HANDLE_SIZE + cert.len() + signature.len(),
    );
    body.put_u8(REGISTER_ID);
    body.put_slice(&public_key);
    body.put_u8(KEY_HANDLE_SIZE as u8);
    body.put_slice(&key_handle);
    body.put_slice(&cert);
    body.put_slice(&signature);

    device.consume_presence();
    info!("Credential registered");

    Ok(Response::success(Some(body.freeze())))
}
