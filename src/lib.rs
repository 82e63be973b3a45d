//! Library interface for hid2term.
//!
//! Everything the firmware does apart from touching peripherals lives
//! here, so the translation logic can be tested on the host (no embedded
//! hardware required).
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and is only built with `--features embedded`.

#![cfg_attr(not(test), no_std)]

// This must go first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod config;
pub mod engine;
pub mod error;
pub mod hid;
pub mod host;
pub mod joystick;
pub mod keepalive;
pub mod link;
pub mod protocol;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════

pub use config::BridgeConfig;
pub use engine::{Bridge, KeyOutcome};
pub use error::Error;
pub use hid::{KeyEventHandler, KeyboardLayout, ModifierState, UsBootLayout};
pub use host::{UartReportHost, UsbHost};
pub use joystick::{JoystickEncoder, JoystickPins, JoystickState, Poller};
pub use keepalive::KeepAliveTimer;
pub use link::{Clock, TerminalLink};
pub use protocol::{NavigationKey, Translation};
