/// Stands in for a received byte outside the ASCII range.
pub const NON_ASCII_REPLACEMENT: char = '?';

/// One complete SCIP response: every line the sensor sent for a command,
/// up to and including the empty line that terminates the response.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The raw response text, terminators included.
    pub text: String,
}

impl Frame {
    /// Creates a frame from raw response bytes.
    ///
    /// SCIP is pure ASCII. Each stray non-ASCII byte is replaced by exactly one
    /// [`NON_ASCII_REPLACEMENT`] so that line lengths, and with them the position of
    /// every encoded sample, stay as received. The damaged line then fails its checksum
    /// unless the lost byte was itself a `?`.
    pub fn from_bytes(bytes: &[u8]) -> Frame {
        Frame {
            text: bytes
                .iter()
                .map(|b| {
                    if b.is_ascii() {
                        *b as char
                    } else {
                        NON_ASCII_REPLACEMENT
                    }
                })
                .collect(),
        }
    }

    /// Returns the body lines of the frame, without the two trailing empty lines
    /// produced by the end-of-response marker.
    pub fn lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self.text.split('\n').collect();
        let keep = lines.len().saturating_sub(2);
        lines.truncate(keep);
        lines
    }

    /// The first line of the frame, which echoes the command that was sent.
    pub fn echo(&self) -> Option<&str> {
        self.text.split('\n').next()
    }

    /// The second line of the frame, which carries the status code.
    pub fn status(&self) -> Option<&str> {
        self.text.split('\n').nth(1)
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;

    #[test]
    fn frame_lines_drop_terminator() {
        let frame = Frame::from_bytes(b"BM\n00P\n\n");
        assert_eq!(frame.lines(), vec!["BM", "00P"]);
        assert_eq!(frame.echo(), Some("BM"));
        assert_eq!(frame.status(), Some("00P"));
    }

    #[test]
    fn non_ascii_bytes_keep_line_length() {
        let frame = Frame::from_bytes(b"GD\n00P\n0\xb0\xff1\n\n");
        assert_eq!(frame.lines(), vec!["GD", "00P", "0??1"]);
        assert_eq!(frame.lines()[2].len(), 4);
    }

    #[test]
    fn frame_without_status() {
        let frame = Frame::from_bytes(b"QT\n\n");
        assert_eq!(frame.lines(), vec!["QT"]);
        assert_eq!(frame.status(), Some(""));
    }
}
