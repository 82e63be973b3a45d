//! Output channel and clock seams.
//!
//! The terminal link is write-only: bytes go out, nothing comes back.

use crate::error::Error;

/// Byte sink feeding the legacy terminal.
pub trait TerminalLink {
    /// Write all of `bytes`, in order.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error>;

    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.write(&[byte])
    }
}

impl<T: TerminalLink + ?Sized> TerminalLink for &mut T {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        (**self).write(bytes)
    }
}

/// Capture buffer, handy for tests and for batching.
impl<const N: usize> TerminalLink for heapless::Vec<u8, N> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.extend_from_slice(bytes)
            .map_err(|_| Error::BufferOverflow)
    }
}

#[cfg(test)]
impl TerminalLink for std::vec::Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Write to the terminal; failures are logged and dropped, never retried.
pub(crate) fn send<W: TerminalLink + ?Sized>(link: &mut W, bytes: &[u8]) -> bool {
    match link.write(bytes) {
        Ok(()) => true,
        Err(e) => {
            warn!("terminal write of {} bytes failed: {}", bytes.len(), e);
            false
        }
    }
}
