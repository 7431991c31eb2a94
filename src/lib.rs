//! # Urg Driver
//!
//! `urg` is a driver for Hokuyo URG series laser range finders speaking the SCIP2.0 protocol.
//! It provides access to the sensor parameters, laser control and single-scan capture.
//!
//! The protocol engine, [`UrgSession`], is event driven: it hands commands to a [`Transport`]
//! and is fed received bytes in chunks of any size. [`UrgDevice`] wraps it into a blocking
//! API over any `Read + Write` stream, such as a serial port opened with [`serial::open`].

extern crate log;

mod answers;
pub mod base;
pub mod checksum;
mod cmds;
mod internals;
pub mod length_codec;
mod parsers;
mod session;
pub mod types;
pub mod utils;

#[cfg(feature = "serial")]
pub mod serial;

#[cfg(test)]
mod test_support;

pub use crate::base::{Channel, Error, Frame, FrameBuffer, Result, Transport};
pub use crate::internals::{URG_DEFAULT_BITRATE, URG_DEFAULT_TIMEOUT};
use crate::internals::URG_IDLE_READ_BACKOFF;
pub use crate::session::{SessionStateKind, UrgSession};
pub use crate::types::{
    DeviceInfo, Parity, ScanCapture, SensorParameters, SerialOptions, INVALID_DISTANCE,
};

use log::{error, trace, warn};
use std::cell::RefCell;
use std::io::{Read, Write};
use std::rc::Rc;
use std::thread::sleep;
use std::time::{Duration, Instant};

type ResultSlot<R> = Rc<RefCell<Option<Result<R>>>>;

fn result_slot<R>() -> ResultSlot<R> {
    Rc::new(RefCell::new(None))
}

/// Blocking access to a URG sensor over a `Read + Write` stream.
///
/// Every operation sends its command, then reads from the stream until the reply is
/// decoded or the timeout elapses. On timeout the pending command is abandoned so the
/// device stays usable.
///
/// # Example
/// ```ignore
/// # use urg::{UrgDevice, SerialOptions};
/// let port = urg::serial::open("/dev/ttyACM0", &SerialOptions::default())?;
/// let mut device = UrgDevice::with_stream(port);
/// let params = device.connect()?;
/// device.set_laser(true)?;
/// let scan = device.capture_once()?;
/// assert_eq!(scan.len(), params.sample_count());
/// device.disconnect()?;
/// drop(device.into_stream());
/// ```
#[derive(Debug)]
pub struct UrgDevice<T: ?Sized> {
    session: UrgSession<Channel<T>>,
}

impl<T: ?Sized> UrgDevice<T>
where
    T: Read + Write,
{
    /// Constructs a new `UrgDevice` using an existing `Channel`.
    pub fn new(channel: Channel<T>) -> UrgDevice<T> {
        trace!("Creating new UrgDevice");
        UrgDevice {
            session: UrgSession::new(channel),
        }
    }

    /// Constructs a new `UrgDevice` directly from a communication stream (e.g., a serial port).
    pub fn with_stream(stream: Box<T>) -> UrgDevice<T> {
        UrgDevice::new(Channel::new(stream))
    }

    /// The underlying event-driven session.
    pub fn session(&self) -> &UrgSession<Channel<T>> {
        &self.session
    }

    /// Sensor parameters read by the last successful `connect`.
    pub fn parameters(&self) -> Option<&SensorParameters> {
        self.session.parameters()
    }

    /// Returns `true` while the laser is on.
    pub fn is_laser_on(&self) -> bool {
        self.session.is_laser_on()
    }

    /// Switches the sensor to SCIP2.0 and reads its parameters.
    /// Uses the default timeout (`URG_DEFAULT_TIMEOUT`).
    pub fn connect(&mut self) -> Result<SensorParameters> {
        self.connect_with_timeout(URG_DEFAULT_TIMEOUT)
    }

    /// Switches the sensor to SCIP2.0 and reads its parameters, with a specified timeout
    /// covering both commands.
    pub fn connect_with_timeout(&mut self, timeout: Duration) -> Result<SensorParameters> {
        trace!("Connecting with timeout {:?}", timeout);
        let slot = result_slot();
        let s = slot.clone();
        self.session
            .connect(move |result| *s.borrow_mut() = Some(result));
        self.wait_for(&slot, timeout)
    }

    /// Turns the laser on or off. Uses the default timeout.
    pub fn set_laser(&mut self, on: bool) -> Result<()> {
        self.set_laser_with_timeout(on, URG_DEFAULT_TIMEOUT)
    }

    /// Turns the laser on or off, with a specified timeout.
    pub fn set_laser_with_timeout(&mut self, on: bool, timeout: Duration) -> Result<()> {
        trace!("Setting laser {} with timeout {:?}", on, timeout);
        let slot = result_slot();
        let s = slot.clone();
        self.session
            .set_laser(on, move |result| *s.borrow_mut() = Some(result));
        self.wait_for(&slot, timeout)
    }

    /// Captures one scan over the full index range. Uses the default timeout.
    ///
    /// The laser must be on. Returns one distance per index from `index_min` to
    /// `index_max`, with [`INVALID_DISTANCE`] for samples that could not be decoded.
    pub fn capture_once(&mut self) -> Result<ScanCapture> {
        self.capture_once_with_timeout(URG_DEFAULT_TIMEOUT)
    }

    /// Captures one scan over the full index range, with a specified timeout.
    pub fn capture_once_with_timeout(&mut self, timeout: Duration) -> Result<ScanCapture> {
        trace!("Capturing one scan with timeout {:?}", timeout);
        let slot = result_slot();
        let (captured, failed) = (slot.clone(), slot.clone());
        self.session.capture_once(
            move |scan| *captured.borrow_mut() = Some(Ok(scan.clone())),
            move |err| *failed.borrow_mut() = Some(Err(err)),
        );
        self.wait_for(&slot, timeout)
    }

    /// Turns the laser off if needed and closes the stream. Uses the default timeout.
    pub fn disconnect(&mut self) -> Result<()> {
        self.disconnect_with_timeout(URG_DEFAULT_TIMEOUT)
    }

    /// Turns the laser off if needed and closes the stream, with a specified timeout.
    pub fn disconnect_with_timeout(&mut self, timeout: Duration) -> Result<()> {
        trace!("Disconnecting with timeout {:?}", timeout);
        let slot = result_slot();
        let s = slot.clone();
        self.session
            .disconnect(move |result| *s.borrow_mut() = Some(result));
        match self.wait_for(&slot, timeout) {
            Err(Error::OperationTimeout) => {
                warn!("No reply to QT, closing anyway");
                self.session.close()
            }
            other => other,
        }
    }

    /// Gives the stream back, e.g. to release a serial port after
    /// [`disconnect`](UrgDevice::disconnect).
    pub fn into_stream(self) -> Box<T> {
        self.session.into_transport().into_inner()
    }

    /// Pumps the stream into the session until `slot` is filled or `timeout` elapses.
    fn wait_for<R>(&mut self, slot: &ResultSlot<R>, timeout: Duration) -> Result<R> {
        let start = Instant::now();
        loop {
            if let Some(result) = slot.borrow_mut().take() {
                return result;
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                warn!("Timeout waiting for reply after {:?}", elapsed);
                self.session.reset();
                return Err(Error::OperationTimeout);
            }

            let chunk = match self.session.transport_mut().read_chunk() {
                Ok(chunk) => chunk.to_vec(),
                Err(e) => {
                    error!("Error reading from stream: {}", e);
                    self.session.on_receive_error(&e.to_string());
                    self.session.reset();
                    return Err(e);
                }
            };
            if chunk.is_empty() {
                sleep(URG_IDLE_READ_BACKOFF.min(timeout - elapsed));
            } else {
                self.session.on_receive(&chunk);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{capture_frame, parameter_frame_for_range, FakeSensor};

    fn sensor() -> FakeSensor {
        let values: Vec<u32> = (0..=100).map(|i| 300 + 2 * i).collect();
        FakeSensor::new(5)
            .reply("SCIP2.0", b"SCIP2.0\n0Ee\n\n".to_vec())
            .reply("PP", parameter_frame_for_range(0, 100))
            .reply("BM", b"BM\n00P\n\n".to_vec())
            .reply("QT", b"QT\n00P\n\n".to_vec())
            .reply("GD000000010001", capture_frame("GD000000010001", &values, None))
    }

    #[test]
    fn full_session() {
        let mut device = UrgDevice::with_stream(Box::new(sensor()));
        let params = device.connect().unwrap();
        assert_eq!(params.model, "UTM-30LX");
        assert_eq!(params.sample_count(), 101);

        device.set_laser(true).unwrap();
        let scan = device.capture_once().unwrap();
        assert_eq!(scan.len(), 101);
        assert_eq!(scan.valid_count(), 101);
        assert_eq!(scan.distances()[0], 300);
        assert_eq!(scan.distances()[100], 500);

        device.disconnect().unwrap();
        assert!(!device.is_laser_on());
        assert!(device.session().transport().is_closed());
        let _released: Box<FakeSensor> = device.into_stream();
    }

    #[test]
    fn capture_with_laser_off_fails_fast() {
        let mut device = UrgDevice::with_stream(Box::new(sensor()));
        device.connect().unwrap();
        assert!(matches!(device.capture_once(), Err(Error::NotReady { .. })));
    }

    #[test]
    fn missing_reply_times_out_and_recovers() {
        let silent = FakeSensor::new(5)
            .reply("SCIP2.0", b"SCIP2.0\n00P\n\n".to_vec())
            .reply("PP", parameter_frame_for_range(0, 100));
        let mut device = UrgDevice::with_stream(Box::new(silent));
        device.connect().unwrap();

        let result = device.set_laser_with_timeout(true, Duration::from_millis(20));
        assert!(matches!(result, Err(Error::OperationTimeout)));
        assert!(!device.session().is_busy());
        assert!(!device.is_laser_on());

        // Laser never came on, so disconnect needs no reply.
        device.disconnect().unwrap();
    }

    struct EndOfStream {
        reads: usize,
    }

    impl Read for EndOfStream {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            self.reads += 1;
            Ok(0)
        }
    }

    impl Write for EndOfStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn empty_reads_back_off_until_timeout() {
        let mut device = UrgDevice::with_stream(Box::new(EndOfStream { reads: 0 }));
        let result = device.connect_with_timeout(Duration::from_millis(50));
        assert!(matches!(result, Err(Error::OperationTimeout)));
        let reads = device.session.transport_mut().stream_mut().reads;
        assert!(reads <= 50, "{} reads in 50 ms", reads);
    }
}
