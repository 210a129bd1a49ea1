//! Personalize (provisioning class)
//!
//! Request: ignored. Response: the new attestation public key (X | Y).

use bytes::Bytes;
use nexum_apdu_core::{Command, Response};
use rand_v8::{CryptoRng, RngCore};
use tracing::info;

use crate::{Authenticator, Result, counter, secret::MasterSecret, store::Store};

/// Generate and persist a new device master secret and reset the signature
/// counter. Answers the new attestation public key (X ‖ Y).
///
/// Every key handle issued before this call stops authenticating, since the
/// wrapping secret changes.
pub(crate) fn handle<S: Store, R: RngCore + CryptoRng>(
    device: &mut Authenticator<S, R>,
    _command: &Command,
) -> Result<Response> {
    let secret = MasterSecret::generate(&mut device.rng);
    secret.persist(&mut device.store)?;
    counter::persist(&mut device.store, 0)?;

    info!("Device personalized, signature counter reset");

    Ok(Response::success(Some(Bytes::copy_from_slice(
        secret.public_key(),
    ))))
}
