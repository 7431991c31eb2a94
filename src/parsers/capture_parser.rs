use crate::answers::URG_STATUS_OK;
use crate::base::{Error, Frame, Result};
use crate::length_codec::LengthDecoder;
use crate::types::ScanCapture;
use log::{trace, warn};

/*
 * Layout of a GD reply, one phase per line until the distance lines:
 *
 *   GD000440072501   echoed command
 *   00P              status
 *   0DKO>            timestamp
 *   00i00i00i00i...  distance lines, 64 characters plus checksum each
 */
#[derive(Debug, Clone, Copy, PartialEq)]
enum CapturePhase {
    Command,
    Status,
    Timestamp,
    Distances,
}

/// Decodes the reply to a capture `command` into `scan`.
///
/// `scan` must already be sized for the requested index range and filled with
/// the invalid sentinel. Data lines failing their checksum leave their samples
/// invalid without failing the capture.
pub fn parse_capture(
    frame: &Frame,
    command: &str,
    decoder: &mut LengthDecoder,
    scan: &mut ScanCapture,
) -> Result<()> {
    let mut phase = CapturePhase::Command;
    let mut cursor = 0usize;
    let mut surplus = 0usize;
    decoder.reset();

    let distances = scan.distances_mut();
    for line in frame.lines() {
        match phase {
            CapturePhase::Command => {
                if line != command {
                    return Err(Error::ProtocolMismatch {
                        description: format!("capture echo {:?}, expected {:?}", line, command),
                    });
                }
                phase = CapturePhase::Status;
            }
            CapturePhase::Status => {
                if line != URG_STATUS_OK {
                    return Err(Error::ProtocolMismatch {
                        description: format!("capture status {:?}", line),
                    });
                }
                phase = CapturePhase::Timestamp;
            }
            CapturePhase::Timestamp => {
                trace!("Ignoring capture timestamp {:?}", line);
                phase = CapturePhase::Distances;
            }
            CapturePhase::Distances => {
                decoder.decode_line(line.as_bytes(), |value| {
                    match distances.get_mut(cursor) {
                        Some(slot) => *slot = value,
                        None => surplus += 1,
                    }
                    cursor += 1;
                });
            }
        }
    }

    if phase != CapturePhase::Distances {
        return Err(Error::StructuralFailure {
            description: format!("capture reply ended in phase {:?}", phase),
        });
    }
    if surplus > 0 {
        warn!("Capture reply carried {} values beyond the requested range", surplus);
    } else if cursor < distances.len() {
        warn!(
            "Capture reply carried {} of {} values, the rest stay invalid",
            cursor,
            distances.len()
        );
    }
    if !decoder.carry_over().is_empty() {
        warn!(
            "Capture reply ended with {} undecoded characters",
            decoder.carry_over().len()
        );
    }

    trace!("Decoded {} capture values", cursor.min(distances.len()));
    Ok(())
}
