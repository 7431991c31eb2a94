use crate::internals::URG_DEFAULT_BITRATE;

/// Marks a sample whose distance could not be decoded.
pub const INVALID_DISTANCE: i32 = -1;

/// Static description of the connected sensor, as reported by the `PP` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorParameters {
    /// Sensor model name.
    pub model: String,
    /// Minimum measurable distance in millimeters.
    pub distance_min: u32,
    /// Maximum measurable distance in millimeters.
    pub distance_max: u32,
    /// Angular resolution, as the number of divisions of a full circle.
    pub angular_resolution: u32,
    /// First valid angular index.
    pub index_min: u32,
    /// Last valid angular index (inclusive).
    pub index_max: u32,
    /// Angular index pointing straight ahead.
    pub index_front: u32,
    /// Standard motor speed in revolutions per minute.
    pub angular_velocity: u32,
}

impl SensorParameters {
    /// Number of samples in a full-range scan.
    #[inline]
    pub fn sample_count(&self) -> usize {
        (self.index_max - self.index_min) as usize + 1
    }
}

/// Distances of one scan, one entry per angular index from `first_index` on.
///
/// Entries are millimeters, or [`INVALID_DISTANCE`] where the sensor reported nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCapture {
    first_index: u32,
    distances: Vec<i32>,
}

impl ScanCapture {
    /// Creates a capture of `len` samples, all invalid.
    pub fn new(first_index: u32, len: usize) -> ScanCapture {
        ScanCapture {
            first_index,
            distances: vec![INVALID_DISTANCE; len],
        }
    }

    /// Resizes the capture and marks every sample invalid, keeping the allocation.
    pub fn reset(&mut self, first_index: u32, len: usize) {
        self.first_index = first_index;
        self.distances.clear();
        self.distances.resize(len, INVALID_DISTANCE);
    }

    /// Angular index of the first sample.
    #[inline]
    pub fn first_index(&self) -> u32 {
        self.first_index
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Returns `true` if the capture holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// All samples, invalid ones included.
    #[inline]
    pub fn distances(&self) -> &[i32] {
        &self.distances
    }

    pub(crate) fn distances_mut(&mut self) -> &mut [i32] {
        &mut self.distances
    }

    /// Iterates over `(angular index, distance in mm)` of the valid samples only.
    pub fn valid_samples(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter(|(_, d)| **d >= 0)
            .map(move |(i, d)| (self.first_index + i as u32, *d as u32))
    }

    /// Number of valid samples.
    pub fn valid_count(&self) -> usize {
        self.distances.iter().filter(|d| **d >= 0).count()
    }
}

/// Parity setting of the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
}

/// Options used when opening the serial link to the sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialOptions {
    /// Line speed in bits per second. Ignored by USB-connected sensors.
    pub bitrate: u32,
    /// Parity setting.
    pub parity: Parity,
}

impl SerialOptions {
    /// Creates `SerialOptions` with a specific bitrate and no parity.
    pub fn with_bitrate(bitrate: u32) -> SerialOptions {
        SerialOptions {
            bitrate,
            parity: Parity::None,
        }
    }
}

impl Default for SerialOptions {
    /// 19200 bps, no parity.
    fn default() -> SerialOptions {
        SerialOptions::with_bitrate(URG_DEFAULT_BITRATE)
    }
}

/// A serial device the sensor may be attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Path or name used to open the device (e.g. `/dev/ttyACM0`, `COM3`).
    pub identifier: String,
    /// Human-readable description.
    pub display_name: String,
}
