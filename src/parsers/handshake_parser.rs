use crate::answers::URG_HANDSHAKE_ACCEPTED;
use crate::base::{Frame, Result};
use crate::cmds::URG_CMD_SCIP20;
use crate::parsers::check_echo_and_status;

/// Validates the reply to `SCIP2.0`. The reply carries no payload.
pub fn parse_handshake(frame: &Frame) -> Result<()> {
    check_echo_and_status(frame, URG_CMD_SCIP20, URG_HANDSHAKE_ACCEPTED)
}
