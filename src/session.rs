//! Event-driven SCIP2.0 session.
//!
//! [`UrgSession`] never blocks. Commands return immediately after handing their bytes to
//! the transport; the outcome is delivered to the callback once the owner of the receiving
//! side has pushed the complete reply through [`UrgSession::on_receive`].

use crate::base::{Error, Frame, FrameBuffer, Result, Transport};
use crate::cmds::*;
use crate::internals::URG_GD_BYTES_PER_LENGTH;
use crate::length_codec::LengthDecoder;
use crate::parsers::capture_parser::parse_capture;
use crate::parsers::handshake_parser::parse_handshake;
use crate::parsers::parameter_parser::parse_parameters;
use crate::parsers::toggle_parser::parse_laser_toggle;
use crate::types::{ScanCapture, SensorParameters};
use log::{error, trace, warn};
use std::fmt;
use std::mem;

type ConnectCallback = Box<dyn FnOnce(Result<SensorParameters>)>;
type LaserCallback = Box<dyn FnOnce(Result<()>)>;
type CaptureCallback = Box<dyn FnOnce(&ScanCapture)>;
type CaptureFailedCallback = Box<dyn FnOnce(Error)>;
type DisconnectCallback = Box<dyn FnOnce(Result<()>)>;

/// What to do once the laser toggle reply is in.
enum LaserContinuation {
    Caller(LaserCallback),
    Disconnect(DisconnectCallback),
}

enum SessionState {
    Idle,
    AwaitingHandshake {
        on_connected: ConnectCallback,
    },
    AwaitingParameters {
        on_connected: ConnectCallback,
    },
    AwaitingLaserToggle {
        on: bool,
        then: LaserContinuation,
    },
    AwaitingCapture {
        command: String,
        bytes_per_length: usize,
        scan: ScanCapture,
        on_captured: CaptureCallback,
        on_failed: CaptureFailedCallback,
    },
}

impl SessionState {
    fn kind(&self) -> SessionStateKind {
        match self {
            SessionState::Idle => SessionStateKind::Idle,
            SessionState::AwaitingHandshake { .. } => SessionStateKind::AwaitingHandshake,
            SessionState::AwaitingParameters { .. } => SessionStateKind::AwaitingParameters,
            SessionState::AwaitingLaserToggle { on, .. } => {
                SessionStateKind::AwaitingLaserToggle(*on)
            }
            SessionState::AwaitingCapture { .. } => SessionStateKind::AwaitingCapture,
        }
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind())
    }
}

/// The command a [`UrgSession`] is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStateKind {
    /// Nothing in flight.
    Idle,
    /// `SCIP2.0` sent.
    AwaitingHandshake,
    /// `PP` sent as the second half of `connect`.
    AwaitingParameters,
    /// `BM` (`true`) or `QT` (`false`) sent.
    AwaitingLaserToggle(bool),
    /// `GD` sent.
    AwaitingCapture,
}

/// One SCIP2.0 conversation with a sensor over `transport`.
///
/// At most one command is in flight. Issuing another one while a reply is pending
/// fails that new command with [`Error::Busy`] and leaves the pending one untouched.
///
/// Callbacks run from inside [`on_receive`](UrgSession::on_receive) (or from the issuing
/// call when it fails right away) and cannot call back into the session; hand results
/// out through a channel or a shared cell.
///
/// # Example
/// ```ignore
/// let mut session = UrgSession::new(transport);
/// session.connect(|result| println!("connected: {:?}", result));
/// // later, for every chunk read from the port:
/// session.on_receive(&chunk);
/// ```
#[derive(Debug)]
pub struct UrgSession<T> {
    transport: T,
    state: SessionState,
    frame_buffer: FrameBuffer,
    parameters: Option<SensorParameters>,
    laser_on: bool,
    scan_buffer: Option<ScanCapture>,
}

impl<T: Transport> UrgSession<T> {
    /// Creates an idle session over `transport`.
    pub fn new(transport: T) -> UrgSession<T> {
        trace!("Creating new UrgSession");
        UrgSession {
            transport,
            state: SessionState::Idle,
            frame_buffer: FrameBuffer::new(),
            parameters: None,
            laser_on: false,
            scan_buffer: None,
        }
    }

    /// The command currently awaiting its reply.
    pub fn state(&self) -> SessionStateKind {
        self.state.kind()
    }

    /// Returns `true` while a command is awaiting its reply.
    pub fn is_busy(&self) -> bool {
        !matches!(self.state, SessionState::Idle)
    }

    /// Returns `true` once the sensor confirmed `BM` and has not confirmed `QT` since.
    pub fn is_laser_on(&self) -> bool {
        self.laser_on
    }

    /// Sensor parameters obtained by the last successful [`connect`](UrgSession::connect).
    pub fn parameters(&self) -> Option<&SensorParameters> {
        self.parameters.as_ref()
    }

    /// Gives access to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Gives mutable access to the transport, e.g. to read from it.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the session and returns its transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Switches the sensor to SCIP2.0 and reads its parameters.
    ///
    /// Sends `SCIP2.0`, then `PP` once the handshake is accepted. `on_connected` receives
    /// the parameters, or the error of whichever step failed.
    pub fn connect<F>(&mut self, on_connected: F)
    where
        F: FnOnce(Result<SensorParameters>) + 'static,
    {
        if self.is_busy() {
            warn!("connect rejected: {:?} in flight", self.state);
            on_connected(Err(Error::Busy));
            return;
        }

        trace!("Connecting");
        self.frame_buffer.clear();
        self.parameters = None;
        self.laser_on = false;
        self.state = SessionState::AwaitingHandshake {
            on_connected: Box::new(on_connected),
        };
        self.send_command(URG_CMD_SCIP20);
    }

    /// Turns the laser on or off.
    ///
    /// Completes immediately, without talking to the sensor, if the laser is already in
    /// the requested state.
    pub fn set_laser<F>(&mut self, on: bool, on_set: F)
    where
        F: FnOnce(Result<()>) + 'static,
    {
        if self.laser_on == on {
            trace!("Laser already {}", if on { "on" } else { "off" });
            on_set(Ok(()));
            return;
        }
        if self.is_busy() {
            warn!("set_laser rejected: {:?} in flight", self.state);
            on_set(Err(Error::Busy));
            return;
        }

        self.state = SessionState::AwaitingLaserToggle {
            on,
            then: LaserContinuation::Caller(Box::new(on_set)),
        };
        self.send_command(if on { URG_CMD_BM } else { URG_CMD_QT });
    }

    /// Captures one scan over the full index range reported by the sensor.
    ///
    /// The laser must be on and the session connected. Exactly one of `on_captured` and
    /// `on_failed` is called. The scan passed to `on_captured` is reused by the next
    /// capture; copy what you need to keep.
    pub fn capture_once<F, G>(&mut self, on_captured: F, on_failed: G)
    where
        F: FnOnce(&ScanCapture) + 'static,
        G: FnOnce(Error) + 'static,
    {
        if self.is_busy() {
            warn!("capture_once rejected: {:?} in flight", self.state);
            on_failed(Error::Busy);
            return;
        }
        let (index_min, len) = match &self.parameters {
            Some(params) => (params.index_min, params.sample_count()),
            None => {
                error!("capture_once before sensor parameters are known");
                on_failed(Error::NotReady {
                    description: "sensor parameters unknown, connect first".to_owned(),
                });
                return;
            }
        };
        if !self.laser_on {
            error!("capture_once with laser off");
            on_failed(Error::NotReady {
                description: "laser is off".to_owned(),
            });
            return;
        }
        let index_max = index_min + (len as u32 - 1);

        let mut scan = self
            .scan_buffer
            .take()
            .unwrap_or_else(|| ScanCapture::new(index_min, len));
        scan.reset(index_min, len);

        let command = make_gd_command(index_min, index_max);
        trace!("Capturing {} samples with {}", len, command);
        self.state = SessionState::AwaitingCapture {
            command: command.clone(),
            bytes_per_length: URG_GD_BYTES_PER_LENGTH,
            scan,
            on_captured: Box::new(on_captured),
            on_failed: Box::new(on_failed),
        };
        self.send_command(&command);
    }

    /// Turns the laser off if needed, then closes the transport.
    ///
    /// `on_disconnected` receives the outcome of closing the transport, whatever the
    /// laser reply was. A command still in flight is abandoned without being resolved;
    /// its late reply then fails the `QT` echo check and the transport is closed anyway.
    pub fn disconnect<F>(&mut self, on_disconnected: F)
    where
        F: FnOnce(Result<()>) + 'static,
    {
        if self.is_busy() {
            warn!("Disconnecting with {:?} in flight, abandoning it", self.state);
            self.reset();
        }

        if self.laser_on {
            trace!("Turning laser off before disconnecting");
            self.state = SessionState::AwaitingLaserToggle {
                on: false,
                then: LaserContinuation::Disconnect(Box::new(on_disconnected)),
            };
            self.send_command(URG_CMD_QT);
        } else {
            self.finish_disconnect(Box::new(on_disconnected));
        }
    }

    /// Feeds bytes received from the sensor. Chunks may be of any size.
    pub fn on_receive(&mut self, chunk: &[u8]) {
        let mut next = self.frame_buffer.feed(chunk);
        while let Some(frame) = next {
            self.on_frame(frame);
            next = self.frame_buffer.next_frame();
        }
    }

    /// Reports the delayed outcome of the last send, for transports that learn it later.
    pub fn on_send_complete(&mut self, success: bool) {
        if success {
            trace!("Send completed");
        } else {
            error!("Transport reported a failed send while {:?}", self.state);
            self.fail_pending(Error::TransportSendFailed {
                description: "transport reported delivery failure".to_owned(),
            });
        }
    }

    /// Reports an error on the receiving side of the transport.
    ///
    /// The pending command, if any, stays pending: its reply may still arrive.
    pub fn on_receive_error(&mut self, description: &str) {
        warn!("Receive error while {:?}: {}", self.state, description);
    }

    /// Abandons the pending command, if any, without resolving it, and discards any
    /// partially received reply.
    ///
    /// Meant for callers that give up waiting, e.g. after a timeout. A late reply to the
    /// abandoned command is then dropped, or rejected by the next command's echo check.
    pub fn reset(&mut self) {
        if self.is_busy() {
            warn!("Abandoning {:?}", self.state);
        }
        if let SessionState::AwaitingCapture { scan, .. } =
            mem::replace(&mut self.state, SessionState::Idle)
        {
            self.scan_buffer = Some(scan);
        }
        self.frame_buffer.clear();
    }

    /// Closes the transport right away, without turning the laser off first.
    ///
    /// A pending command is abandoned as with [`reset`](UrgSession::reset).
    pub fn close(&mut self) -> Result<()> {
        self.reset();
        trace!("Closing transport");
        self.laser_on = false;
        self.transport.close()
    }

    fn send_command(&mut self, command: &str) {
        trace!("Sending command {} while {:?}", command, self.state);
        if let Err(e) = self.transport.send(&encode_command(command)) {
            error!("Failed to send {}: {}", command, e);
            self.fail_pending(e);
        }
    }

    fn fail_pending(&mut self, err: Error) {
        match mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Idle => warn!("No pending command to fail with: {}", err),
            SessionState::AwaitingHandshake { on_connected }
            | SessionState::AwaitingParameters { on_connected } => on_connected(Err(err)),
            SessionState::AwaitingLaserToggle { then, .. } => match then {
                LaserContinuation::Caller(on_set) => on_set(Err(err)),
                LaserContinuation::Disconnect(on_disconnected) => {
                    warn!("Laser off failed before disconnect: {}", err);
                    self.finish_disconnect(on_disconnected);
                }
            },
            SessionState::AwaitingCapture {
                scan, on_failed, ..
            } => {
                self.scan_buffer = Some(scan);
                on_failed(err);
            }
        }
    }

    fn finish_disconnect(&mut self, on_disconnected: DisconnectCallback) {
        trace!("Closing transport");
        let result = self.transport.close();
        if let Err(e) = &result {
            error!("Failed to close transport: {}", e);
        }
        self.frame_buffer.clear();
        self.laser_on = false;
        on_disconnected(result);
    }

    fn on_frame(&mut self, frame: Frame) {
        trace!("Received frame of {} bytes", frame.text.len());
        match mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Idle => {
                warn!("Dropping unexpected frame {:?}", frame.echo());
            }
            SessionState::AwaitingHandshake { on_connected } => match parse_handshake(&frame) {
                Ok(()) => {
                    self.state = SessionState::AwaitingParameters { on_connected };
                    self.send_command(URG_CMD_PP);
                }
                Err(e) => {
                    error!("Handshake failed: {}", e);
                    on_connected(Err(e));
                }
            },
            SessionState::AwaitingParameters { on_connected } => match parse_parameters(&frame) {
                Ok(params) => {
                    self.parameters = Some(params.clone());
                    on_connected(Ok(params));
                }
                Err(e) => {
                    error!("Parameter query failed: {}", e);
                    on_connected(Err(e));
                }
            },
            SessionState::AwaitingLaserToggle { on, then } => {
                let result = parse_laser_toggle(&frame, on);
                match &result {
                    Ok(()) => {
                        trace!("Laser is now {}", if on { "on" } else { "off" });
                        self.laser_on = on;
                    }
                    Err(e) => error!("Laser toggle failed: {}", e),
                }
                match then {
                    LaserContinuation::Caller(on_set) => on_set(result),
                    LaserContinuation::Disconnect(on_disconnected) => {
                        self.finish_disconnect(on_disconnected)
                    }
                }
            }
            SessionState::AwaitingCapture {
                command,
                bytes_per_length,
                mut scan,
                on_captured,
                on_failed,
            } => {
                let mut decoder = LengthDecoder::new(bytes_per_length);
                match parse_capture(&frame, &command, &mut decoder, &mut scan) {
                    Ok(()) => on_captured(&scan),
                    Err(e) => {
                        error!("Capture failed: {}", e);
                        on_failed(e);
                    }
                }
                self.scan_buffer = Some(scan);
            }
        }
    }
}
