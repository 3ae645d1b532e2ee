// k720-rs/k720/src/channel/serial.rs

//! Serial-port channel backed by the `serialport` crate.

use std::io::{Read, Write};
use std::time::Duration;

use crate::channel::traits::Channel;
use crate::{Error, Result};

/// Channel over an open serial port (RF610 RS-232 link, 9600 8N1 default).
pub struct SerialChannel {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialChannel {
    /// Open a serial port by OS name (`COM3`, `/dev/ttyUSB0`) at the given
    /// baud rate. Enumeration of candidate ports is the caller's concern.
    pub fn open(path: &str, baud: u32) -> Result<Self> {
        if baud == 0 {
            return Err(Error::InvalidConfig("baud rate must be non-zero".into()));
        }
        let port = serialport::new(path, baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(crate::utils::default_read_timeout())
            .open()?;
        Ok(Self { port })
    }
}

impl Channel for SerialChannel {
    fn write(&mut self, data: &[u8], timeout: Duration) -> Result<()> {
        self.port.set_timeout(timeout)?;
        match self.port.write_all(data) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(Error::WriteTimeout),
            Err(_) => Err(Error::Closed),
        }
    }

    fn read(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>> {
        self.port.set_timeout(timeout)?;
        let mut buf = vec![0u8; max_len];
        match self.port.read(&mut buf) {
            Ok(0) => Err(Error::Closed),
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(Error::ReadTimeout),
            Err(_) => Err(Error::Closed),
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_baud_rejected_before_open() {
        assert!(matches!(
            SerialChannel::open("/dev/null", 0),
            Err(Error::InvalidConfig(_))
        ));
    }
}
