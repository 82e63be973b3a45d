//! Unified error type for hid2term.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for on-target
//! logging.

use core::fmt;

/// Top-level error type used across the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The USB host transport could not be brought up.
    ///
    /// Not fatal: the bridge keeps pinging and polling the joystick,
    /// it just never sees key events.
    UsbHostInit,

    /// The terminal UART rejected a write.
    Link,

    /// Buffer too small for the requested operation.
    BufferOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UsbHostInit => f.write_str("USB host did not start"),
            Error::Link => f.write_str("terminal link write failed"),
            Error::BufferOverflow => f.write_str("buffer overflow"),
        }
    }
}
