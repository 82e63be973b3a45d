//! USB HID keyboard report (boot protocol) and key-event extraction.
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: Modifier keys (bitfield, see `modifiers`)
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```
//!
//! Boot keyboards send a full snapshot on every change, so key-down and
//! key-up events are recovered by comparing each report with the one
//! before it.

use super::modifiers::ModifierState;
use super::KeyEventHandler;

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// Usage code a keyboard reports in every slot when too many keys are down.
pub const KEY_ERROR_ROLLOVER: u8 = 0x01;

/// Standard USB HID boot-protocol keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: ModifierState,
    /// Reserved byte (0x00 on boot keyboards).
    pub reserved: u8,
    /// Up to 6 simultaneously pressed key codes.
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: ModifierState::empty(),
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    /// Parse from raw boot report bytes. Extra trailing bytes are ignored.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < KEYBOARD_REPORT_SIZE {
            return None;
        }
        Some(Self {
            modifier: ModifierState::from_byte(data[0]),
            reserved: data[1],
            keycodes: [data[2], data[3], data[4], data[5], data[6], data[7]],
        })
    }

    /// Returns `true` if no keys are pressed (release event).
    pub fn is_empty(&self) -> bool {
        self.modifier.is_empty() && self.keycodes.iter().all(|&k| k == 0)
    }

    /// Rollover reports carry no usable key state.
    pub fn is_rollover(&self) -> bool {
        self.keycodes[0] == KEY_ERROR_ROLLOVER
    }

    /// Whether `code` is among the pressed keys.
    pub fn contains(&self, code: u8) -> bool {
        code != 0 && self.keycodes.contains(&code)
    }

    /// Pressed key codes, skipping empty slots.
    pub fn keys(&self) -> impl Iterator<Item = u8> + '_ {
        self.keycodes.iter().copied().filter(|&k| k != 0)
    }
}

/// Turns successive boot reports into modifier / key-down / key-up events.
#[derive(Clone, Debug, Default)]
pub struct BootReportParser {
    previous: KeyboardReport,
}

impl BootReportParser {
    pub const fn new() -> Self {
        Self {
            previous: KeyboardReport::empty(),
        }
    }

    /// The last report that was accepted.
    pub fn previous(&self) -> &KeyboardReport {
        &self.previous
    }

    /// Forget the previous report, e.g. after the keyboard went away.
    pub fn reset(&mut self) {
        self.previous = KeyboardReport::empty();
    }

    /// Dispatch the events implied by `report` to `handler`.
    ///
    /// Key-down events carry the new modifier byte; key-up events carry
    /// the modifier byte that was current while the key was held.
    pub fn parse(&mut self, report: &KeyboardReport, handler: &mut dyn KeyEventHandler) {
        if report.is_rollover() {
            trace!("rollover report ignored");
            return;
        }

        let previous = self.previous;

        if previous.modifier != report.modifier {
            handler.on_modifiers_changed(previous.modifier, report.modifier);
        }

        for code in report.keys() {
            if !previous.contains(code) {
                handler.on_key_down(report.modifier, code);
            }
        }

        for code in previous.keys() {
            if !report.contains(code) {
                handler.on_key_up(previous.modifier, code);
            }
        }

        self.previous = *report;
    }
}
