use crate::base::error::{Error, Result};
use crate::base::traits::Transport;
use log::{error, trace};
use std::io;

const DEFAULT_CHANNEL_READ_BUFFER_SIZE: usize = 1024;

/// Channel adapts a blocking `Read + Write` stream (e.g. a serial port) to the [`Transport`] contract
///
/// Writes are flushed immediately. Reads are pulled explicitly with [`Channel::read_chunk`]
/// and pushed into the session by the caller.
///
/// # Examples
/// ```ignore
/// let mut channel = Channel::new(serial_port);
/// channel.send(b"BM\n").unwrap();
/// ```
#[derive(Debug)]
pub struct Channel<T: ?Sized> {
    stream: Box<T>,
    read_buffer: Vec<u8>,
    closed: bool,
}

impl<T: ?Sized> Channel<T>
where
    T: io::Read + io::Write,
{
    /// Create a new `Channel` over `stream`
    pub fn new(stream: Box<T>) -> Channel<T> {
        Channel::with_read_buffer_size(stream, DEFAULT_CHANNEL_READ_BUFFER_SIZE)
    }

    /// Create a new `Channel` with a non-default read chunk size
    pub fn with_read_buffer_size(stream: Box<T>, read_buffer_size: usize) -> Channel<T> {
        trace!("Creating new Channel with read chunk size {}", read_buffer_size);
        Channel {
            stream,
            read_buffer: vec![0; read_buffer_size.max(1)],
            closed: false,
        }
    }

    /// Returns `true` once [`Transport::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Reads whatever the stream has available.
    ///
    /// Returns an empty slice when the stream timed out without data.
    pub fn read_chunk(&mut self) -> Result<&[u8]> {
        if self.closed {
            return Err(Error::NotReady {
                description: "channel is closed".to_owned(),
            });
        }
        match self.stream.read(&mut self.read_buffer) {
            Ok(read) => {
                trace!("Read {} bytes from stream", read);
                Ok(&self.read_buffer[..read])
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut || e.kind() == io::ErrorKind::WouldBlock => {
                trace!("Stream read timed out");
                Ok(&self.read_buffer[..0])
            }
            Err(e) => {
                error!("IO error reading from stream: {}", e);
                Err(e.into())
            }
        }
    }

    /// Gives access to the underlying stream.
    pub fn stream_mut(&mut self) -> &mut T {
        &mut self.stream
    }

    /// Consumes the channel and returns the underlying stream.
    pub fn into_inner(self) -> Box<T> {
        self.stream
    }
}

impl<T: ?Sized> Transport for Channel<T>
where
    T: io::Read + io::Write,
{
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        if self.closed {
            return Err(Error::TransportSendFailed {
                description: "channel is closed".to_owned(),
            });
        }
        trace!("Channel writing {} bytes", bytes.len());
        let written = self
            .stream
            .write_all(bytes)
            .and_then(|_| self.stream.flush());
        written.map_err(|e| {
            error!("IO error writing to stream: {}", e);
            Error::TransportSendFailed {
                description: e.to_string(),
            }
        })
    }

    /// Flushes the stream and refuses further traffic. The stream itself stays open
    /// until the channel is dropped or taken apart with [`Channel::into_inner`].
    fn close(&mut self) -> Result<()> {
        trace!("Closing channel");
        self.closed = true;
        self.stream.flush()?;
        Ok(())
    }
}
