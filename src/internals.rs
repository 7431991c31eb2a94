use std::time::Duration;

/// Default timeout duration for waiting for responses from the sensor.
pub const URG_DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default serial bitrate of URG sensors.
pub const URG_DEFAULT_BITRATE: u32 = 19200;

/// Characters per encoded distance in `GD` responses.
pub const URG_GD_BYTES_PER_LENGTH: usize = 3;

/// Angular steps in a full circle, as used to map indices to angles.
pub const URG_ANGLE_STEPS_PER_CIRCLE: u32 = 1024;

/// Pause after a read that returned no data.
pub const URG_IDLE_READ_BACKOFF: Duration = Duration::from_millis(2);

/// Read timeout configured on serial ports so blocking reads return control regularly.
#[cfg(feature = "serial")]
pub const URG_SERIAL_POLL_INTERVAL: Duration = Duration::from_millis(10);
