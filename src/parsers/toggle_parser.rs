use crate::answers::URG_TOGGLE_ACCEPTED;
use crate::base::{Frame, Result};
use crate::cmds::{URG_CMD_BM, URG_CMD_QT};
use crate::parsers::check_echo_and_status;

/// Validates the reply to `BM` (`on == true`) or `QT` (`on == false`).
pub fn parse_laser_toggle(frame: &Frame, on: bool) -> Result<()> {
    let command = if on { URG_CMD_BM } else { URG_CMD_QT };
    check_echo_and_status(frame, command, URG_TOGGLE_ACCEPTED)
}

#[cfg(test)]
mod tests {
    use super::parse_laser_toggle;
    use crate::base::Frame;

    #[test]
    fn laser_on_replies() {
        assert!(parse_laser_toggle(&Frame::from_bytes(b"BM\n00P\n\n"), true).is_ok());
        assert!(parse_laser_toggle(&Frame::from_bytes(b"BM\n02R\n\n"), true).is_ok());
        // 01Q: laser malfunction
        assert!(parse_laser_toggle(&Frame::from_bytes(b"BM\n01Q\n\n"), true).is_err());
    }

    #[test]
    fn laser_off_expects_qt_echo() {
        assert!(parse_laser_toggle(&Frame::from_bytes(b"QT\n00P\n\n"), false).is_ok());
        assert!(parse_laser_toggle(&Frame::from_bytes(b"BM\n00P\n\n"), false).is_err());
    }
}
