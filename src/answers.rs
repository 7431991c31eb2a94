// Status lines are two status characters followed by their checksum.

/// Command accepted.
pub const URG_STATUS_OK: &str = "00P";

/// `SCIP2.0` sent while the sensor already speaks SCIP2.0.
pub const URG_STATUS_ALREADY_SCIP20: &str = "0Ee";

/// `BM` sent while the laser is already on, or `QT` while already off.
pub const URG_STATUS_ALREADY_SET: &str = "02R";

/// Status codes accepted in reply to the handshake.
pub const URG_HANDSHAKE_ACCEPTED: &[&str] = &[URG_STATUS_OK, URG_STATUS_ALREADY_SCIP20];

/// Status codes accepted in reply to `BM` and `QT`.
pub const URG_TOGGLE_ACCEPTED: &[&str] = &[URG_STATUS_OK, URG_STATUS_ALREADY_SET];

/// Status codes accepted in reply to `PP`.
pub const URG_PARAMETERS_ACCEPTED: &[&str] = &[URG_STATUS_OK];

// Keys of the `PP` response lines. Each line reads `KEY:value;c` where `c` is the checksum.

pub const URG_PARAM_MODEL: &str = "MODL:";
pub const URG_PARAM_DISTANCE_MIN: &str = "DMIN:";
pub const URG_PARAM_DISTANCE_MAX: &str = "DMAX:";
pub const URG_PARAM_ANGULAR_RESOLUTION: &str = "ARES:";
pub const URG_PARAM_INDEX_MIN: &str = "AMIN:";
pub const URG_PARAM_INDEX_MAX: &str = "AMAX:";
pub const URG_PARAM_INDEX_FRONT: &str = "AFRT:";
pub const URG_PARAM_ANGULAR_VELOCITY: &str = "SCAN:";

/// Length of every `PP` key, colon included.
pub const URG_PARAM_KEY_LEN: usize = 5;

/// Characters after the value on a `PP` line: the `;` separator and the checksum.
pub const URG_PARAM_SUFFIX_LEN: usize = 2;
