//! Distance encoding of SCIP data lines.
//!
//! Every distance is sent as a fixed number of characters, each carrying 6 bits
//! (`char - 0x30`), most significant first. A value may straddle two lines; the
//! characters left at the end of one line are prefixed to the next one.

use crate::checksum::{append_checksum, verify_line};
use crate::types::INVALID_DISTANCE;
use log::{trace, warn};

const URG_ENCODE_OFFSET: u8 = 0x30;
const URG_ENCODE_MASK: u32 = 0x3f;
const URG_ENCODE_BITS: u32 = 6;

/// Decodes one value from its encoded characters.
#[inline]
pub fn decode_length(encoded: &[u8]) -> u32 {
    encoded.iter().fold(0u32, |acc, c| {
        (acc << URG_ENCODE_BITS) | ((c.wrapping_sub(URG_ENCODE_OFFSET)) as u32 & URG_ENCODE_MASK)
    })
}

/// Encodes `value` into `width` characters. Bits above `6 * width` are dropped.
pub fn encode_length(value: u32, width: usize) -> String {
    (0..width)
        .rev()
        .map(|i| {
            let shift = URG_ENCODE_BITS * i as u32;
            let bits = value.checked_shr(shift).unwrap_or(0) & URG_ENCODE_MASK;
            (bits as u8 + URG_ENCODE_OFFSET) as char
        })
        .collect()
}

/// Encodes `values` and splits the stream into checksummed lines of at most
/// `line_len` payload characters, the way the sensor does (64 for real devices).
pub fn encode_data_lines(values: &[u32], width: usize, line_len: usize) -> Vec<String> {
    let stream: String = values.iter().map(|v| encode_length(*v, width)).collect();
    stream
        .as_bytes()
        .chunks(line_len.max(1))
        .map(|chunk| append_checksum(&String::from_utf8_lossy(chunk)))
        .collect()
}

/// Stateful decoder for the data lines of one response.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthDecoder {
    bytes_per_length: usize,
    carry_over: Vec<u8>,
}

impl LengthDecoder {
    /// Creates a decoder for values of `bytes_per_length` characters (2 or 3 for SCIP).
    pub fn new(bytes_per_length: usize) -> LengthDecoder {
        LengthDecoder {
            bytes_per_length: bytes_per_length.max(1),
            carry_over: Vec::with_capacity(bytes_per_length),
        }
    }

    /// Characters per value.
    #[inline]
    pub fn bytes_per_length(&self) -> usize {
        self.bytes_per_length
    }

    /// Characters held back from the previous line.
    #[inline]
    pub fn carry_over(&self) -> &[u8] {
        &self.carry_over
    }

    /// Forgets any carried-over characters, ready for a new response.
    pub fn reset(&mut self) {
        self.carry_over.clear();
    }

    /// Decodes one data line (checksum character included) and hands every value to `out`.
    ///
    /// A line failing its checksum still produces as many values as it would have
    /// held, all [`INVALID_DISTANCE`], so that later values stay at their index.
    /// Returns the number of values produced.
    pub fn decode_line(&mut self, line: &[u8], mut out: impl FnMut(i32)) -> usize {
        let line_is_valid = verify_line(line).is_ok();

        let mut content = std::mem::take(&mut self.carry_over);
        if let Some((_, body)) = line.split_last() {
            content.extend_from_slice(body);
        }

        let remainder = content.len() % self.bytes_per_length;
        let complete = content.len() - remainder;
        let count = complete / self.bytes_per_length;

        if line_is_valid {
            for encoded in content[..complete].chunks(self.bytes_per_length) {
                out(decode_length(encoded) as i32);
            }
        } else {
            warn!(
                "Checksum failure on data line {:?}, marking {} samples invalid",
                String::from_utf8_lossy(line),
                count
            );
            for _ in 0..count {
                out(INVALID_DISTANCE);
            }
        }

        self.carry_over = content.split_off(complete);
        if !self.carry_over.is_empty() {
            trace!("Carrying {} characters to next line", self.carry_over.len());
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode_all(lines: &[String], width: usize) -> Vec<i32> {
        let mut decoder = LengthDecoder::new(width);
        let mut values = Vec::new();
        for line in lines {
            decoder.decode_line(line.as_bytes(), |v| values.push(v));
        }
        values
    }

    #[test]
    fn decodes_documented_samples() {
        // Example values from the SCIP2.0 reference.
        assert_eq!(decode_length(b"1Dh"), 5432);
        assert_eq!(decode_length(b"CB"), 1234);
        assert_eq!(encode_length(5432, 3), "1Dh");
        assert_eq!(encode_length(1234, 2), "CB");
    }

    #[test]
    fn value_split_across_lines() {
        // "1Dh" split as "1D" | "h".
        let lines = vec![append_checksum("0011D"), append_checksum("h00i")];
        let mut decoder = LengthDecoder::new(3);
        let mut values = Vec::new();
        assert_eq!(decoder.decode_line(lines[0].as_bytes(), |v| values.push(v)), 1);
        assert_eq!(decoder.carry_over(), b"1D");
        assert_eq!(decoder.decode_line(lines[1].as_bytes(), |v| values.push(v)), 2);
        assert!(decoder.carry_over().is_empty());
        assert_eq!(values, vec![1, 5432, 57]);
    }

    #[test]
    fn corrupted_line_keeps_alignment() {
        let values: Vec<u32> = (0..30).map(|i| 1000 + i * 7).collect();
        let mut lines = encode_data_lines(&values, 3, 16);
        // '~' is outside the checksum alphabet.
        lines[1].pop();
        lines[1].push('~');
        let decoded = decode_all(&lines, 3);
        assert_eq!(decoded.len(), values.len());
        // Line 0 holds 16 characters: values 0..5 and a carried character.
        // Line 1 completes values 5..10 and carries two characters.
        for (i, d) in decoded.iter().enumerate() {
            if (5..10).contains(&i) {
                assert_eq!(*d, INVALID_DISTANCE, "index {}", i);
            } else {
                assert_eq!(*d, values[i] as i32, "index {}", i);
            }
        }
    }

    #[test]
    fn empty_line_produces_nothing() {
        let mut decoder = LengthDecoder::new(3);
        assert_eq!(decoder.decode_line(b"", |_| panic!("no values expected")), 0);
    }

    proptest! {
        #[test]
        fn round_trip_within_width(value in 0u32..(1 << 18)) {
            let encoded = encode_length(value, 3);
            prop_assert_eq!(decode_length(encoded.as_bytes()), value);
        }

        #[test]
        fn split_point_does_not_change_values(
            values in prop::collection::vec(0u32..(1 << 18), 1..40),
            split in any::<prop::sample::Index>(),
        ) {
            let stream: String = values.iter().map(|v| encode_length(*v, 3)).collect();
            let at = split.index(stream.len() + 1);
            let whole = vec![append_checksum(&stream)];
            let parts = vec![append_checksum(&stream[..at]), append_checksum(&stream[at..])];
            let expected: Vec<i32> = values.iter().map(|v| *v as i32).collect();
            prop_assert_eq!(decode_all(&whole, 3), expected.clone());
            prop_assert_eq!(decode_all(&parts, 3), expected);
        }
    }
}
