// k720-rs/k720/src/channel/hid.rs

//! USB-HID channel backed by the `hidapi` crate.
//!
//! The dispenser's USB interface is a HID-class device exchanging 64-byte
//! reports. Each outbound report is `[report_id=0][len][payload...]`,
//! zero-padded; inbound reports carry `[len][payload...]`. The logical frame
//! is identical to the serial variant.

use std::collections::VecDeque;
use std::time::Duration;

use crate::channel::traits::Channel;
use crate::{Error, Result};

/// Usable payload bytes per 64-byte report (one byte holds the length).
const REPORT_PAYLOAD_LEN: usize = 63;

/// Channel over an open HID device handle.
pub struct HidChannel {
    device: Option<hidapi::HidDevice>,
    /// Payload bytes unpacked from reports but not yet consumed.
    rx: VecDeque<u8>,
}

impl HidChannel {
    /// Open the first HID device matching the vendor/product id pair.
    pub fn open(vid: u16, pid: u16) -> Result<Self> {
        let api = hidapi::HidApi::new().map_err(|e| Error::HidOpenFailed(e.to_string()))?;
        if !api.device_list().any(|d| d.vendor_id() == vid && d.product_id() == pid) {
            return Err(Error::NoHidDevice);
        }
        let device = api
            .open(vid, pid)
            .map_err(|e| Error::HidOpenFailed(e.to_string()))?;
        Ok(Self {
            device: Some(device),
            rx: VecDeque::new(),
        })
    }

    /// Close the device handle. Further I/O fails with `NotOpen`; closing
    /// twice fails with `HidClosed`.
    pub fn close(&mut self) -> Result<()> {
        if self.device.take().is_none() {
            return Err(Error::HidClosed);
        }
        self.rx.clear();
        Ok(())
    }

    fn device(&self) -> Result<&hidapi::HidDevice> {
        self.device.as_ref().ok_or(Error::NotOpen)
    }

    /// Read one report into the rx buffer. Returns false on timeout.
    fn pump(&mut self, timeout: Duration) -> Result<bool> {
        let mut report = [0u8; 64];
        let n = self
            .device()?
            .read_timeout(&mut report, timeout_ms(timeout))
            .map_err(|_| Error::Closed)?;
        if n == 0 {
            return Ok(false);
        }
        let len = (report[0] as usize).min(REPORT_PAYLOAD_LEN).min(n.saturating_sub(1));
        self.rx.extend(&report[1..1 + len]);
        Ok(true)
    }
}

impl Channel for HidChannel {
    fn write(&mut self, data: &[u8], _timeout: Duration) -> Result<()> {
        for chunk in data.chunks(REPORT_PAYLOAD_LEN) {
            let mut report = [0u8; 65];
            // report[0] is the HID report id (always 0)
            report[1] = chunk.len() as u8;
            report[2..2 + chunk.len()].copy_from_slice(chunk);
            let written = self.device()?.write(&report).map_err(|_| Error::Closed)?;
            if written == 0 {
                return Err(Error::WriteTimeout);
            }
        }
        Ok(())
    }

    fn read(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>> {
        if self.rx.is_empty() && !self.pump(timeout)? {
            return Err(Error::ReadTimeout);
        }
        let n = self.rx.len().min(max_len);
        Ok(self.rx.drain(..n).collect())
    }

    fn flush(&mut self) -> Result<()> {
        self.rx.clear();
        // Drain any reports already queued by the device.
        while self.pump(Duration::ZERO)? {}
        Ok(())
    }
}

/// Millisecond timeout for `hidapi`, saturating at `i32::MAX` instead of
/// wrapping on large durations.
fn timeout_ms(timeout: Duration) -> i32 {
    timeout.as_millis().try_into().unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ms;

    fn closed_channel() -> HidChannel {
        HidChannel {
            device: None,
            rx: VecDeque::new(),
        }
    }

    #[test]
    fn io_on_closed_channel_fails_not_open() {
        let mut ch = closed_channel();
        assert!(matches!(ch.write(&[0x01], ms(10)), Err(Error::NotOpen)));
        assert!(matches!(ch.read(16, ms(10)), Err(Error::NotOpen)));
    }

    #[test]
    fn double_close_rejected() {
        let mut ch = closed_channel();
        assert!(matches!(ch.close(), Err(Error::HidClosed)));
    }

    #[test]
    fn timeout_saturates_instead_of_wrapping() {
        assert_eq!(timeout_ms(ms(500)), 500);
        assert_eq!(timeout_ms(Duration::from_secs(u64::MAX)), i32::MAX);
        assert!(timeout_ms(Duration::from_millis(i32::MAX as u64 + 1)) == i32::MAX);
    }
}
