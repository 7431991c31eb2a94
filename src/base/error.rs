use std::error;
use std::fmt;
use std::io;

/// Represents errors that can occur while talking to a URG sensor.
#[derive(Debug)]
pub enum Error {
    /// The transport refused or failed to deliver a command. Contains a description of the failure.
    TransportSendFailed { description: String },

    /// The echoed command or the status code did not match what was expected.
    ProtocolMismatch { description: String },

    /// A response line failed checksum validation. Contains the offending line.
    ChecksumFailure { line: String },

    /// The response frame is missing an expected phase or carries an unparsable field.
    StructuralFailure { description: String },

    /// Another command is still waiting for its response.
    Busy,

    /// The session is not in a state where the operation can be issued.
    NotReady { description: String },

    /// The execution of operation is timed out.
    OperationTimeout,

    /// An I/O error occurred while communicating with the underlying stream (e.g., serial port).
    IoError(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TransportSendFailed { description } => {
                write!(f, "transport send failed: {}", description)
            }
            Error::ProtocolMismatch { description } => {
                write!(f, "protocol mismatch: {}", description)
            }
            Error::ChecksumFailure { line } => write!(f, "checksum failure on line {:?}", line),
            Error::StructuralFailure { description } => {
                write!(f, "malformed response: {}", description)
            }
            Error::Busy => write!(f, "another command is in flight"),
            Error::NotReady { description } => write!(f, "not ready: {}", description),
            Error::OperationTimeout => write!(f, "operation timeout"),
            Error::IoError(err) => write!(f, "io error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoError(err)
    }
}

/// A specialized `Result` type for URG operations.
pub type Result<T> = std::result::Result<T, Error>;
