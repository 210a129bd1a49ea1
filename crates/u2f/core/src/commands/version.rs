//! U2F_VERSION
//!
//! Request: empty. Response: the ASCII string `U2F_V2`.

use bytes::Bytes;
use nexum_apdu_core::{Command, Response, status};

use crate::constants::VERSION;

/// U2F_VERSION: no data, answers the protocol version string
pub(crate) fn handle(command: &Command) -> Response {
    if command.lc() != 0 {
        return Response::error(status::WRONG_LENGTH);
    }
    Response::success(Some(Bytes::from_static(VERSION)))
}
