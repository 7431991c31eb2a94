// Commands are sent as ASCII text terminated by a line feed.

/// Switches the sensor into SCIP2.0 mode. Used as the handshake.
pub const URG_CMD_SCIP20: &str = "SCIP2.0";

/// Requests the sensor parameters (model, distance limits, index range, ...).
pub const URG_CMD_PP: &str = "PP";

/// Turns the laser on. Required before any measurement.
pub const URG_CMD_BM: &str = "BM";

/// Turns the laser off.
pub const URG_CMD_QT: &str = "QT";

/// Prefix of the single-scan capture command with 3-character distance encoding.
pub const URG_CMD_GD: &str = "GD";

/// Cluster count suffix of the capture command: one index per value.
pub const URG_GD_CLUSTER_COUNT: &str = "01";

/// Line terminator appended to every command.
pub const URG_CMD_TERMINATOR: u8 = b'\n';

/// Builds a `GD` command covering `start..=end`, e.g. `GD000440072501` for 44 to 725.
pub fn make_gd_command(start: u32, end: u32) -> String {
    format!(
        "{}{:05}{:05}{}",
        URG_CMD_GD, start, end, URG_GD_CLUSTER_COUNT
    )
}

/// Returns the bytes to put on the wire for `command`.
pub fn encode_command(command: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(command.len() + 1);
    bytes.extend_from_slice(command.as_bytes());
    bytes.push(URG_CMD_TERMINATOR);
    bytes
}
