// k720-rs/k720/src/channel/mock.rs

use std::collections::VecDeque;
use std::time::Duration;

use crate::channel::traits::Channel;
use crate::{Error, Result};

/// Mock channel for unit tests. It records written frames and returns queued
/// read chunks; an empty queue sleeps out the caller's timeout so elapsed
/// time in retry tests matches a silent device.
#[derive(Debug, Default)]
pub struct MockChannel {
    /// Every write call, in order.
    pub written: Vec<Vec<u8>>,
    /// Queued read chunks, consumed front to back.
    pub reads: VecDeque<Vec<u8>>,
    /// Number of flush calls observed.
    pub flushes: usize,
    /// Testing hook: number of write calls that should fail with WriteTimeout.
    pub write_failures: usize,
    /// When false, an empty read queue fails immediately instead of sleeping.
    pub sleep_on_empty: bool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            sleep_on_empty: true,
            ..Self::default()
        }
    }

    /// Queue a chunk to be returned by a later read.
    pub fn push_read(&mut self, chunk: Vec<u8>) {
        self.reads.push_back(chunk);
    }

    /// Set how many subsequent write calls should fail (for tests).
    pub fn set_write_failures(&mut self, n: usize) {
        self.write_failures = n;
    }

    /// All written bytes concatenated, for interleaving assertions.
    pub fn written_flat(&self) -> Vec<u8> {
        self.written.iter().flatten().copied().collect()
    }
}

impl Channel for MockChannel {
    fn write(&mut self, data: &[u8], _timeout: Duration) -> Result<()> {
        if self.write_failures > 0 {
            self.write_failures -= 1;
            return Err(Error::WriteTimeout);
        }
        self.written.push(data.to_vec());
        Ok(())
    }

    fn read(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>> {
        match self.reads.front_mut() {
            Some(front) => {
                if front.len() <= max_len {
                    Ok(self.reads.pop_front().unwrap_or_default())
                } else {
                    let head: Vec<u8> = front.drain(..max_len).collect();
                    Ok(head)
                }
            }
            None => {
                if self.sleep_on_empty {
                    std::thread::sleep(timeout);
                }
                Err(Error::ReadTimeout)
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        // Tests pre-seed exactly the bytes each exchange should see, so
        // flush only counts calls and leaves the queue intact.
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ms;

    #[test]
    fn mock_channel_records_writes() {
        let mut ch = MockChannel::new();
        ch.write(&[0xF2, 0x01], ms(100)).unwrap();
        assert_eq!(ch.written.len(), 1);
        assert_eq!(ch.written_flat(), vec![0xF2, 0x01]);
    }

    #[test]
    fn mock_channel_chunked_reads() {
        let mut ch = MockChannel::new();
        ch.push_read(vec![0x06]);
        ch.push_read(vec![0x01, 0x02, 0x03]);

        assert_eq!(ch.read(16, ms(10)).unwrap(), vec![0x06]);
        // max_len smaller than chunk: remainder stays queued
        assert_eq!(ch.read(2, ms(10)).unwrap(), vec![0x01, 0x02]);
        assert_eq!(ch.read(16, ms(10)).unwrap(), vec![0x03]);
        assert!(matches!(ch.read(16, ms(1)), Err(Error::ReadTimeout)));
    }

    #[test]
    fn mock_channel_write_failures() {
        let mut ch = MockChannel::new();
        ch.set_write_failures(1);
        assert!(matches!(
            ch.write(&[0x00], ms(10)),
            Err(Error::WriteTimeout)
        ));
        ch.write(&[0x00], ms(10)).unwrap();
        assert_eq!(ch.written.len(), 1);
    }

    #[test]
    fn mock_channel_empty_read_sleeps_timeout() {
        let mut ch = MockChannel::new();
        let start = std::time::Instant::now();
        let _ = ch.read(16, ms(30));
        assert!(start.elapsed() >= ms(30));
    }
}
