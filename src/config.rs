//! Application-wide constants and compile-time configuration.
//!
//! Timing parameters, UART settings and the firmware variant selection
//! live here so they can be tuned in one place.

// Timing

/// Idle time after which a keep-alive ping is sent (ms).
pub const PING_INTERVAL_MS: u64 = 3700;

/// Delay between hardware init and the startup marker (ms).
pub const STARTUP_DELAY_MS: u64 = 200;

/// Upper bound on one main-loop iteration while waiting for bridge bytes (ms).
pub const LOOP_TICK_MS: u64 = 2;

// UART

/// Baud rate expected by the legacy terminal.
pub const TERMINAL_BAUD: u32 = 6992;

/// Sync prefix the USB-host bridge module puts in front of every boot report.
/// A sum byte follows the report, see `host::frame_checksum`.
pub const REPORT_FRAME_SYNC: [u8; 2] = [0x57, 0xAB];

/// Bytes buffered between the bridge UART and the report parser.
pub const HOST_RX_QUEUE_LEN: usize = 64;

/// Reference clock of the nRF52 UARTE baud generator (Hz).
const UARTE_CLOCK_HZ: u64 = 16_000_000;

/// Raw UARTE `BAUDRATE` register value for an arbitrary baud rate.
///
/// The peripheral only honours the top 20 bits of the register.
pub const fn uarte_baudrate(baud: u32) -> u32 {
    let raw = (((baud as u64) << 32) + UARTE_CLOCK_HZ / 2) / UARTE_CLOCK_HZ;
    (raw as u32) & 0xFFFF_F000
}

// GPIO pin assignments (nRF52840-DK defaults)
//
// Wired in `main.rs`; adjust there for a custom board.
//
//   Terminal TX        → P0.06
//   Bridge module TX   → P0.08 (our RX)
//   Joystick BUTTON 1  → P1.01
//   Joystick UP        → P1.02
//   Joystick DOWN      → P1.03
//   Joystick LEFT      → P1.04
//   Joystick RIGHT     → P1.05
//
// Joystick lines are active-low with the internal pull-up enabled.

// Variant selection

/// Which UARTE instance drives the terminal (the other one listens to
/// the USB-host bridge module).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TerminalPort {
    Uarte0,
    Uarte1,
}

/// What to do with a non-printable key that has no escape sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnmappedKeyPolicy {
    /// Write `[0xNN]` to the terminal, inline with protocol bytes.
    DiagnosticText,
    /// Log the scancode and send nothing.
    Drop,
}

/// Per-image configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeConfig {
    pub terminal_port: TerminalPort,
    /// Poll the joystick port every loop iteration.
    pub joystick: bool,
    pub unmapped_keys: UnmappedKeyPolicy,
    /// Identical consecutive samples required before a joystick change
    /// is reported. 1 disables debouncing.
    pub joystick_debounce_samples: u8,
    pub ping_interval_ms: u64,
}

impl BridgeConfig {
    /// Keyboard-only image.
    pub const KEYBOARD_ONLY: Self = Self {
        terminal_port: TerminalPort::Uarte0,
        joystick: false,
        unmapped_keys: UnmappedKeyPolicy::DiagnosticText,
        joystick_debounce_samples: 1,
        ping_interval_ms: PING_INTERVAL_MS,
    };

    /// Keyboard + joystick image.
    pub const WITH_JOYSTICK: Self = Self {
        terminal_port: TerminalPort::Uarte1,
        joystick: true,
        ..Self::KEYBOARD_ONLY
    };
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BRIDGE
    }
}

/// Configuration baked into this build.
#[cfg(not(feature = "joystick"))]
pub const BRIDGE: BridgeConfig = BridgeConfig::KEYBOARD_ONLY;

/// Configuration baked into this build.
#[cfg(feature = "joystick")]
pub const BRIDGE: BridgeConfig = BridgeConfig::WITH_JOYSTICK;
