use crate::base::error::Result;

/// The outgoing half of the byte channel to the sensor.
///
/// Received bytes travel the other way: whoever owns the receiving side pushes them
/// into [`UrgSession::on_receive`](crate::UrgSession::on_receive) in chunks of any size.
pub trait Transport {
    /// Queues `bytes` for delivery to the sensor.
    ///
    /// An `Err` means the bytes will never be delivered. Transports that learn about a
    /// failed delivery only later report it through
    /// [`UrgSession::on_send_complete`](crate::UrgSession::on_send_complete).
    fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Closes the connection to the sensor.
    fn close(&mut self) -> Result<()>;
}
