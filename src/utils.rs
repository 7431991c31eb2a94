use crate::internals::URG_ANGLE_STEPS_PER_CIRCLE;
use crate::types::{ScanCapture, SensorParameters};
use log::trace;
use std::f32::consts::TAU;

/// Angle of an angular index relative to the sensor's forward direction, in radians.
///
/// Positive angles are counter-clockwise seen from above. Uses the fixed 1024-step
/// circle of the SCIP index convention.
#[inline]
pub fn index_to_radians(index: u32, index_front: u32) -> f32 {
    (index as f32 - index_front as f32) * (TAU / URG_ANGLE_STEPS_PER_CIRCLE as f32)
}

/// Converts the valid samples of `scan` to Cartesian points in millimeters.
///
/// `x` points forward and `y` to the right of the sensor, the orientation used when
/// drawing a scan with the forward direction pointing up. Invalid samples are skipped.
///
/// # Arguments
///
/// * `scan` - A decoded scan.
/// * `params` - Parameters of the sensor that produced it, for the forward index.
pub fn to_cartesian(scan: &ScanCapture, params: &SensorParameters) -> Vec<(f32, f32)> {
    let points: Vec<(f32, f32)> = scan
        .valid_samples()
        .map(|(index, distance)| {
            let rad = index_to_radians(index, params.index_front);
            let length = distance as f32;
            (length * rad.cos(), -length * rad.sin())
        })
        .collect();
    trace!(
        "Converted {} of {} samples to Cartesian points",
        points.len(),
        scan.len()
    );
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScanCapture;

    fn params(index_front: u32) -> SensorParameters {
        SensorParameters {
            model: "URG-04LX".to_owned(),
            distance_min: 20,
            distance_max: 5600,
            angular_resolution: 1024,
            index_min: 44,
            index_max: 725,
            index_front,
            angular_velocity: 600,
        }
    }

    #[test]
    fn quarter_circle_is_256_steps() {
        assert_eq!(index_to_radians(384, 384), 0.0);
        assert!((index_to_radians(640, 384) - TAU / 4.0).abs() < 1e-6);
        assert!((index_to_radians(128, 384) + TAU / 4.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_samples_are_not_drawn() {
        let mut scan = ScanCapture::new(384, 257);
        scan.distances_mut()[0] = 1000;
        scan.distances_mut()[256] = 500;
        let points = to_cartesian(&scan, &params(384));
        assert_eq!(points.len(), 2);
        assert!((points[0].0 - 1000.0).abs() < 1e-3 && points[0].1.abs() < 1e-3);
        assert!(points[1].0.abs() < 1e-3 && (points[1].1 + 500.0).abs() < 1e-3);
    }
}
