use crate::answers::*;
use crate::base::{Error, Frame, Result};
use crate::cmds::URG_CMD_PP;
use crate::parsers::check_echo_and_status;
use crate::types::SensorParameters;
use log::trace;

#[derive(Default)]
struct PartialParameters {
    model: Option<String>,
    distance_min: Option<u32>,
    distance_max: Option<u32>,
    angular_resolution: Option<u32>,
    index_min: Option<u32>,
    index_max: Option<u32>,
    index_front: Option<u32>,
    angular_velocity: Option<u32>,
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|e| Error::StructuralFailure {
            description: format!("invalid value {:?} for {}: {}", value, key, e),
        })
}

fn required<T>(value: Option<T>, key: &str) -> Result<T> {
    value.ok_or_else(|| Error::StructuralFailure {
        description: format!("parameter {} missing", key),
    })
}

/// Parses the reply to `PP` into [`SensorParameters`].
///
/// Unknown keys are ignored. Every known key must be present and well formed,
/// otherwise the whole reply is rejected.
pub fn parse_parameters(frame: &Frame) -> Result<SensorParameters> {
    check_echo_and_status(frame, URG_CMD_PP, URG_PARAMETERS_ACCEPTED)?;

    let mut params = PartialParameters::default();
    for line in frame.lines().into_iter().skip(2) {
        if line.len() < URG_PARAM_KEY_LEN + URG_PARAM_SUFFIX_LEN {
            trace!("Skipping short PP line {:?}", line);
            continue;
        }
        let (key, value) = match (
            line.get(..URG_PARAM_KEY_LEN),
            line.get(URG_PARAM_KEY_LEN..line.len() - URG_PARAM_SUFFIX_LEN),
        ) {
            (Some(key), Some(value)) => (key, value),
            _ => continue,
        };

        match key {
            URG_PARAM_MODEL => params.model = Some(value.to_owned()),
            URG_PARAM_DISTANCE_MIN => params.distance_min = Some(parse_number(key, value)?),
            URG_PARAM_DISTANCE_MAX => params.distance_max = Some(parse_number(key, value)?),
            URG_PARAM_ANGULAR_RESOLUTION => {
                params.angular_resolution = Some(parse_number(key, value)?)
            }
            URG_PARAM_INDEX_MIN => params.index_min = Some(parse_number(key, value)?),
            URG_PARAM_INDEX_MAX => params.index_max = Some(parse_number(key, value)?),
            URG_PARAM_INDEX_FRONT => params.index_front = Some(parse_number(key, value)?),
            URG_PARAM_ANGULAR_VELOCITY => {
                params.angular_velocity = Some(parse_number(key, value)?)
            }
            _ => trace!("Ignoring PP line with key {:?}", key),
        }
    }

    let parameters = SensorParameters {
        model: required(params.model, URG_PARAM_MODEL)?,
        distance_min: required(params.distance_min, URG_PARAM_DISTANCE_MIN)?,
        distance_max: required(params.distance_max, URG_PARAM_DISTANCE_MAX)?,
        angular_resolution: required(params.angular_resolution, URG_PARAM_ANGULAR_RESOLUTION)?,
        index_min: required(params.index_min, URG_PARAM_INDEX_MIN)?,
        index_max: required(params.index_max, URG_PARAM_INDEX_MAX)?,
        index_front: required(params.index_front, URG_PARAM_INDEX_FRONT)?,
        angular_velocity: required(params.angular_velocity, URG_PARAM_ANGULAR_VELOCITY)?,
    };

    if parameters.index_min > parameters.index_max {
        return Err(Error::StructuralFailure {
            description: format!(
                "index range {}..{} is empty",
                parameters.index_min, parameters.index_max
            ),
        });
    }

    trace!("Parsed sensor parameters: {:?}", parameters);
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::parse_parameters;
    use crate::base::{Error, Frame};
    use crate::test_support::parameter_frame;

    const URG_04LX: &[(&str, &str)] = &[
        ("MODL:", "URG-04LX(Hokuyo Automatic Co.,Ltd.)"),
        ("DMIN:", "20"),
        ("DMAX:", "5600"),
        ("ARES:", "1024"),
        ("AMIN:", "44"),
        ("AMAX:", "725"),
        ("AFRT:", "384"),
        ("SCAN:", "600"),
    ];

    #[test]
    fn parses_urg_04lx() {
        let params = parse_parameters(&Frame::from_bytes(&parameter_frame(URG_04LX))).unwrap();
        assert_eq!(params.model, "URG-04LX(Hokuyo Automatic Co.,Ltd.)");
        assert_eq!(params.distance_min, 20);
        assert_eq!(params.distance_max, 5600);
        assert_eq!(params.angular_resolution, 1024);
        assert_eq!(params.index_min, 44);
        assert_eq!(params.index_max, 725);
        assert_eq!(params.index_front, 384);
        assert_eq!(params.angular_velocity, 600);
        assert_eq!(params.sample_count(), 682);
    }

    #[test]
    fn ignores_unknown_keys() {
        let mut fields = URG_04LX.to_vec();
        fields.insert(3, ("VEND:", "Hokuyo"));
        assert!(parse_parameters(&Frame::from_bytes(&parameter_frame(&fields))).is_ok());
    }

    #[test]
    fn missing_field_rejects_everything() {
        let fields: Vec<_> = URG_04LX.iter().copied().filter(|(k, _)| *k != "AFRT:").collect();
        let result = parse_parameters(&Frame::from_bytes(&parameter_frame(&fields)));
        assert!(matches!(result, Err(Error::StructuralFailure { .. })));
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let mut fields = URG_04LX.to_vec();
        fields[4] = ("AMIN:", "4x");
        let result = parse_parameters(&Frame::from_bytes(&parameter_frame(&fields)));
        assert!(matches!(result, Err(Error::StructuralFailure { .. })));
    }

    #[test]
    fn failed_status_yields_no_parameters() {
        let result = parse_parameters(&Frame::from_bytes(b"PP\n0Ff\n\n"));
        assert!(matches!(result, Err(Error::ProtocolMismatch { .. })));
    }
}
