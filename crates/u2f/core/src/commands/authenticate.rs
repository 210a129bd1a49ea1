//! U2F_AUTHENTICATE
//!
//! Request: `challenge (32) | application (32) | key handle length (1) |
//! key handle`, control byte in P1.
//!
//! Response: `flags (1) | counter (4, big-endian) | signature`, where the
//! signature is made with the credential key over `application | flags |
//! counter | challenge`.

use bytes::{BufMut, BytesMut};
use nexum_apdu_core::{Command, Response, status};
use rand_v8::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::{
    Authenticator, Result,
    constants::{APP_ID_SIZE, AUTH_FLAG_TUP, CHALLENGE_SIZE, KEY_HANDLE_SIZE, auth_p1},
    counter, crypto,
    key_handle::{KeyWrapper, WrappedKeyHandle},
    secret::MasterSecret,
    store::Store,
};

struct AuthenticateRequest<'a> {
    challenge: &'a [u8; CHALLENGE_SIZE],
    app_id: &'a [u8; APP_ID_SIZE],
    key_handle: &'a WrappedKeyHandle,
}

impl<'a> AuthenticateRequest<'a> {
    /// Parse the request body, `None` if the key handle length is not the one
    /// this device issues or the body does not match it
    fn parse(data: &'a [u8]) -> Option<Self> {
        let (challenge, rest) = data.split_first_chunk::<CHALLENGE_SIZE>()?;
        let (app_id, rest) = rest.split_first_chunk::<APP_ID_SIZE>()?;
        let (&handle_len, key_handle) = rest.split_first()?;
        if handle_len as usize != KEY_HANDLE_SIZE {
            return None;
        }
        Some(Self {
            challenge,
            app_id,
            key_handle: key_handle.try_into().ok()?,
        })
    }
}

pub(crate) fn handle<S: Store, R: RngCore + CryptoRng>(
    device: &mut Authenticator<S, R>,
    command: &Command,
) -> Result<Response> {
    let Some(request) = AuthenticateRequest::parse(command.payload()) else {
        debug!(len = command.lc(), "Authenticate request has wrong length");
        return Ok(Response::error(status::WRONG_LENGTH));
    };

    let secret = MasterSecret::load(&device.store)?;
    let Some(handle) =
        KeyWrapper::new(device.config.wrap, &secret).unwrap(request.key_handle, request.app_id)
    else {
        debug!("Key handle was not issued for this application");
        return Ok(Response::error(status::WRONG_DATA));
    };
    let Some(credential_key) = crypto::signing_key(&handle.private_key()) else {
        debug!("Key handle carries an invalid credential key");
        return Ok(Response::error(status::WRONG_DATA));
    };

    match command.p1 {
        auth_p1::ENFORCE_USER_PRESENCE => {}
        // The handle is ours; U2F answers a check-only probe this way
        auth_p1::CHECK_ONLY => return Ok(Response::error(status::CONDITIONS_NOT_SATISFIED)),
        _ => return Ok(Response::error(status::WRONG_P1P2)),
    }

    if !device.user_present() {
        return Ok(Response::error(status::CONDITIONS_NOT_SATISFIED));
    }

    let counter = counter::advance(&mut device.store)?.to_be_bytes();
    device.consume_presence();

    let mut digest = Sha256::new();
    digest.update(request.app_id);
    digest.update([AUTH_FLAG_TUP]);
    digest.update(counter);
    digest.update(request.challenge);
    let signature = crypto::sign(&credential_key, digest);

    let mut body = BytesMut::with_capacity(1 + counter.len() + signature.len());
    body.put_u8(AUTH_FLAG_TUP);
    body.put_slice(&counter);
    body.put_slice(&signature);

    info!(counter = u32::from_be_bytes(counter), "Authentication signed");

    Ok(Response::success(Some(body.freeze())))
}
