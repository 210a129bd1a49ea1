//! Install attestation certificate (provisioning class)
//!
//! Request: the certificate, at most 2048 bytes. Response: empty.

use nexum_apdu_core::{Command, Response, status};
use rand_v8::{CryptoRng, RngCore};
use tracing::info;

use crate::{
    Authenticator, Result,
    constants::{MAX_ATT_CERT_SIZE, object},
    store::Store,
};

/// Store the attestation certificate verbatim, replacing any previous one.
/// The certificate is not parsed.
pub(crate) fn handle<S: Store, R: RngCore + CryptoRng>(
    device: &mut Authenticator<S, R>,
    command: &Command,
) -> Result<Response> {
    let cert = command.payload();
    if cert.len() > MAX_ATT_CERT_SIZE {
        return Ok(Response::error(status::WRONG_LENGTH));
    }

    device.store.write(object::ATTESTATION_CERT, cert)?;
    info!(len = cert.len(), "Attestation certificate installed");

    Ok(Response::success(None))
}
