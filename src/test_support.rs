//! Fixtures shared by the unit tests: canned sensor replies and a recording transport.

use crate::base::{Error, Result, Transport};
use crate::checksum::append_checksum;
use crate::length_codec::encode_data_lines;
use std::collections::{HashMap, VecDeque};
use std::io;

/// Payload characters per distance line, as sent by real sensors.
pub const DATA_LINE_LEN: usize = 64;

/// Builds a `PP` reply from `(key, value)` pairs.
pub fn parameter_frame(fields: &[(&str, &str)]) -> Vec<u8> {
    let mut text = String::from("PP\n00P\n");
    for (key, value) in fields {
        text.push_str(&append_checksum(&format!("{}{};", key, value)));
        text.push('\n');
    }
    text.push('\n');
    text.into_bytes()
}

/// Parameters of a sensor covering indices `index_min..=index_max`.
pub fn parameter_frame_for_range(index_min: u32, index_max: u32) -> Vec<u8> {
    let amin = index_min.to_string();
    let amax = index_max.to_string();
    parameter_frame(&[
        ("MODL:", "UTM-30LX"),
        ("DMIN:", "23"),
        ("DMAX:", "60000"),
        ("ARES:", "1440"),
        ("AMIN:", amin.as_str()),
        ("AMAX:", amax.as_str()),
        ("AFRT:", "540"),
        ("SCAN:", "2400"),
    ])
}

/// Builds a `GD` reply carrying `values`. When `corrupt_line` is set, that distance
/// line gets a wrong checksum.
pub fn capture_frame(command: &str, values: &[u32], corrupt_line: Option<usize>) -> Vec<u8> {
    let mut text = format!("{}\n00P\n{}\n", command, append_checksum("0DKO"));
    for (i, mut line) in encode_data_lines(values, 3, DATA_LINE_LEN).into_iter().enumerate() {
        if corrupt_line == Some(i) {
            line.pop();
            line.push('~');
        }
        text.push_str(&line);
        text.push('\n');
    }
    text.push('\n');
    text.into_bytes()
}

/// Transport that records what is sent and can be told to fail.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub sent: Vec<Vec<u8>>,
    pub fail_sends: bool,
    pub closed: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sent commands as text, without their line feed.
    pub fn sent_commands(&self) -> Vec<String> {
        self.sent
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).trim_end().to_owned())
            .collect()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        if self.fail_sends {
            return Err(Error::TransportSendFailed {
                description: "mock configured to fail".to_owned(),
            });
        }
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Stream standing in for a sensor on a serial line.
///
/// Every complete command written to it queues the scripted reply, which is then
/// read back `chunk` bytes at a time. Reads with nothing queued time out.
pub struct FakeSensor {
    replies: HashMap<String, Vec<u8>>,
    written: Vec<u8>,
    outgoing: VecDeque<u8>,
    chunk: usize,
}

impl FakeSensor {
    pub fn new(chunk: usize) -> Self {
        FakeSensor {
            replies: HashMap::new(),
            written: Vec::new(),
            outgoing: VecDeque::new(),
            chunk,
        }
    }

    /// Answers `command` with `reply` from now on.
    pub fn reply(mut self, command: &str, reply: Vec<u8>) -> Self {
        self.replies.insert(command.to_owned(), reply);
        self
    }
}

impl io::Read for FakeSensor {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.outgoing.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no data"));
        }
        let n = self.chunk.min(buf.len()).min(self.outgoing.len());
        for (slot, byte) in buf.iter_mut().zip(self.outgoing.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl io::Write for FakeSensor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        while let Some(pos) = self.written.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.written.drain(..=pos).collect();
            let command = String::from_utf8_lossy(&line[..pos]).into_owned();
            if let Some(reply) = self.replies.get(&command) {
                self.outgoing.extend(reply.iter().copied());
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
