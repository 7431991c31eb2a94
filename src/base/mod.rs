mod channel;
mod error;
mod frame_buffer;
mod message;
mod traits;

pub use self::channel::*;
pub use self::error::{Error, Result};
pub use self::frame_buffer::FrameBuffer;
pub use self::message::Frame;
pub use self::traits::Transport;
