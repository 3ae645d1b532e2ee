// k720-rs/k720/src/channel/traits.rs

use std::time::Duration;

use crate::Result;

/// Blocking duplex byte-stream over an open device handle.
///
/// No protocol knowledge lives here. Errors are reported, never retried;
/// retry policy belongs to the exchange engine. Implementations are `Send`
/// so a session can move to, or be shared behind a lock across, threads.
pub trait Channel: Send {
    /// Write all bytes within the timeout.
    fn write(&mut self, data: &[u8], timeout: Duration) -> Result<()>;

    /// Read up to `max_len` bytes, blocking until at least one byte arrives
    /// or the timeout elapses. A timeout with no data is `Error::ReadTimeout`.
    fn read(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>>;

    /// Discard any unread buffered bytes. Called before each exchange so a
    /// prior failed exchange cannot corrupt the next frame.
    fn flush(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::mock::MockChannel;
    use crate::utils::ms;

    #[test]
    fn sessions_move_across_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<MockChannel>();
        assert_send::<Box<dyn Channel>>();
        assert_send::<crate::device::Session>();
    }

    #[test]
    fn trait_object_write_read() {
        let mut ch: Box<dyn Channel> = Box::new(MockChannel::new());
        ch.write(&[0x10], ms(100)).unwrap();
        // Nothing queued: read times out
        assert!(matches!(
            ch.read(16, ms(1)),
            Err(crate::Error::ReadTimeout)
        ));
    }
}
