//! Serial port access through the `serialport` crate.

use crate::base::{Error, Result};
use crate::internals::URG_SERIAL_POLL_INTERVAL;
use crate::types::{DeviceInfo, Parity, SerialOptions};
use log::{error, trace};
use serialport::{SerialPort, SerialPortType};

impl From<serialport::Error> for Error {
    fn from(err: serialport::Error) -> Self {
        Error::IoError(err.into())
    }
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

fn display_name(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => usb
            .product
            .clone()
            .or_else(|| usb.manufacturer.clone())
            .unwrap_or_else(|| format!("USB {:04x}:{:04x}", usb.vid, usb.pid)),
        SerialPortType::PciPort => "PCI serial port".to_owned(),
        SerialPortType::BluetoothPort => "Bluetooth serial port".to_owned(),
        SerialPortType::Unknown => "Serial port".to_owned(),
    }
}

/// Lists the serial devices a sensor may be attached to.
pub fn list_devices() -> Result<Vec<DeviceInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        error!("Failed to enumerate serial ports: {}", e);
        Error::from(e)
    })?;
    let devices: Vec<DeviceInfo> = ports
        .into_iter()
        .map(|port| DeviceInfo {
            display_name: format!("{} ({})", display_name(&port.port_type), port.port_name),
            identifier: port.port_name,
        })
        .collect();
    trace!("Found {} serial devices", devices.len());
    Ok(devices)
}

/// Opens the serial device `identifier`.
///
/// The port gets a short read timeout so that [`UrgDevice`](crate::UrgDevice) can poll it.
///
/// # Example
/// ```ignore
/// let port = urg::serial::open("/dev/ttyACM0", &SerialOptions::default())?;
/// let mut device = UrgDevice::with_stream(port);
/// ```
pub fn open(identifier: &str, options: &SerialOptions) -> Result<Box<dyn SerialPort>> {
    trace!(
        "Opening {} at {} bps, parity {:?}",
        identifier,
        options.bitrate,
        options.parity
    );
    serialport::new(identifier, options.bitrate)
        .parity(options.parity.into())
        .timeout(URG_SERIAL_POLL_INTERVAL)
        .open()
        .map_err(|e| {
            error!("Failed to open {}: {}", identifier, e);
            Error::from(e)
        })
}
