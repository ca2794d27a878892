//! Non-blocking byte input
//!
//! The receiver only ever asks for bytes that have already arrived.

/// Source of already-received bytes
pub trait ByteSource {
    /// Error type for receive operations
    type Error;

    /// Copy pending bytes into `buf`
    ///
    /// Must return immediately: `Ok(0)` when nothing is pending, never
    /// waiting for more data to arrive.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Adapter turning an `embedded-io` reader into a non-blocking [`ByteSource`]
///
/// Only calls `read` after `read_ready` reports data, so a buffered UART
/// receiver returns whatever it holds without blocking.
pub struct ReadyReader<T> {
    inner: T,
}

impl<T> ReadyReader<T> {
    /// Wrap a reader
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Unwrap the reader
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> ByteSource for ReadyReader<T>
where
    T: embedded_io::Read + embedded_io::ReadReady,
{
    type Error = T::Error;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() || !self.inner.read_ready()? {
            return Ok(0);
        }
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// UART stand-in: holds `pending` bytes, reports ready only when non-empty
    struct MockUart {
        pending: &'static [u8],
        reads: usize,
    }

    impl embedded_io::ErrorType for MockUart {
        type Error = core::convert::Infallible;
    }

    impl embedded_io::ReadReady for MockUart {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.pending.is_empty())
        }
    }

    impl embedded_io::Read for MockUart {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            // A real blocking read would stall here on an empty buffer
            assert!(!self.pending.is_empty(), "read called with nothing pending");
            self.reads += 1;
            let n = buf.len().min(self.pending.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending = &self.pending[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_ready_reader_drains_pending_bytes() {
        let mut reader = ReadyReader::new(MockUart {
            pending: b"R:1.0",
            reads: 0,
        });
        let mut buf = [0u8; 16];

        let n = reader.read_available(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"R:1.0");
    }

    #[test]
    fn test_ready_reader_never_reads_when_idle() {
        let mut reader = ReadyReader::new(MockUart {
            pending: b"",
            reads: 0,
        });
        let mut buf = [0u8; 16];

        assert_eq!(reader.read_available(&mut buf).unwrap(), 0);
        assert_eq!(reader.read_available(&mut []).unwrap(), 0);
        assert_eq!(reader.into_inner().reads, 0);
    }
}
