pub mod capture_parser;
pub mod handshake_parser;
pub mod parameter_parser;
pub mod toggle_parser;

use crate::base::{Error, Frame, Result};
use log::trace;

/// Checks that `frame` echoes `command` and carries one of the `accepted` status codes.
pub(crate) fn check_echo_and_status(frame: &Frame, command: &str, accepted: &[&str]) -> Result<()> {
    let echo = frame.echo().unwrap_or_default();
    if echo != command {
        return Err(Error::ProtocolMismatch {
            description: format!("expected echo {:?}, got {:?}", command, echo),
        });
    }

    let status = frame.status().ok_or_else(|| Error::StructuralFailure {
        description: format!("no status line in reply to {:?}", command),
    })?;
    if !accepted.contains(&status) {
        return Err(Error::ProtocolMismatch {
            description: format!("status {:?} in reply to {:?}", status, command),
        });
    }

    trace!("{} answered with status {}", command, status);
    Ok(())
}
