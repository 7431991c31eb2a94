use crate::base::message::Frame;
use log::trace;

/// The end-of-response marker: an empty line right after the last body line.
const FRAME_TERMINATOR: &[u8] = b"\n\n";

/// Accumulates received bytes and cuts them into complete SCIP response frames.
///
/// Chunks may be split anywhere, including between the two line feeds of the
/// end-of-response marker. The buffer grows as needed; there is no line length limit.
///
/// # Example
///
/// ```rust
/// # use urg::base::FrameBuffer;
/// let mut buffer = FrameBuffer::new();
/// assert!(buffer.feed(b"BM\n00").is_none());
/// assert!(buffer.feed(b"P\n").is_none());
/// let frame = buffer.feed(b"\n").unwrap();
/// assert_eq!(frame.lines(), vec!["BM", "00P"]);
/// assert!(buffer.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameBuffer {
    buf: Vec<u8>,
}

impl FrameBuffer {
    /// Creates an empty `FrameBuffer`.
    pub fn new() -> FrameBuffer {
        FrameBuffer { buf: Vec::new() }
    }

    /// Returns the number of bytes received since the last complete frame.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no partial frame is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discards any partially received frame.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Appends a received chunk and returns the next complete frame, if one is now available.
    ///
    /// Bytes received after the end-of-response marker stay buffered as the start of the next frame.
    pub fn feed(&mut self, chunk: &[u8]) -> Option<Frame> {
        // Only the region that could contain a new marker needs to be scanned.
        let scan_from = self.buf.len().saturating_sub(FRAME_TERMINATOR.len() - 1);
        self.buf.extend_from_slice(chunk);
        trace!(
            "FrameBuffer received {} bytes (buffered: {})",
            chunk.len(),
            self.buf.len()
        );
        self.take_frame_from(scan_from)
    }

    /// Returns a complete frame already sitting in the buffer, without feeding new bytes.
    pub fn next_frame(&mut self) -> Option<Frame> {
        self.take_frame_from(0)
    }

    fn take_frame_from(&mut self, scan_from: usize) -> Option<Frame> {
        let pos = self.buf[scan_from..]
            .windows(FRAME_TERMINATOR.len())
            .position(|w| w == FRAME_TERMINATOR)?;
        let end = scan_from + pos + FRAME_TERMINATOR.len();
        let rest = self.buf.split_off(end);
        let frame = Frame::from_bytes(&self.buf);
        self.buf = rest;
        trace!(
            "FrameBuffer extracted frame of {} bytes ({} bytes left over)",
            end,
            self.buf.len()
        );
        Some(frame)
    }
}
