//! Terminal wire protocol.
//!
//! ```text
//! 95            startup marker, sent once
//! 94            keep-alive ping
//! <ascii>       printable key press
//! E5 F5 / E4 F4 Page Up / Page Down
//! E1 F1 / E0 F0 Cursor Left / Right
//! E2 F2 / E3 F3 Cursor Up / Down
//! [0xNN]        unmapped key, literal text
//! 80 101BBBBB   joystick state change
//! ```

use core::fmt::Write;

/// Sent once after initialization.
pub const STARTUP_MARKER: u8 = 0x95;

/// Sent after a full ping interval without typed characters.
pub const PING: u8 = 0x94;

/// Precedes every joystick state byte.
pub const JOYSTICK_MARKER: u8 = 0x80;

/// Keys with a dedicated two-byte escape sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavigationKey {
    PageUp,
    PageDown,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
}

impl NavigationKey {
    pub const ALL: [NavigationKey; 6] = [
        NavigationKey::PageUp,
        NavigationKey::PageDown,
        NavigationKey::CursorLeft,
        NavigationKey::CursorRight,
        NavigationKey::CursorUp,
        NavigationKey::CursorDown,
    ];

    pub const fn from_scancode(scancode: u8) -> Option<Self> {
        match scancode {
            0x4B => Some(NavigationKey::PageUp),
            0x4E => Some(NavigationKey::PageDown),
            0x50 => Some(NavigationKey::CursorLeft),
            0x4F => Some(NavigationKey::CursorRight),
            0x52 => Some(NavigationKey::CursorUp),
            0x51 => Some(NavigationKey::CursorDown),
            _ => None,
        }
    }

    pub const fn scancode(self) -> u8 {
        match self {
            NavigationKey::PageUp => 0x4B,
            NavigationKey::PageDown => 0x4E,
            NavigationKey::CursorLeft => 0x50,
            NavigationKey::CursorRight => 0x4F,
            NavigationKey::CursorUp => 0x52,
            NavigationKey::CursorDown => 0x51,
        }
    }

    /// The bytes the terminal expects for this key.
    pub const fn sequence(self) -> [u8; 2] {
        match self {
            NavigationKey::PageUp => [0xE5, 0xF5],
            NavigationKey::PageDown => [0xE4, 0xF4],
            NavigationKey::CursorLeft => [0xE1, 0xF1],
            NavigationKey::CursorRight => [0xE0, 0xF0],
            NavigationKey::CursorUp => [0xE2, 0xF2],
            NavigationKey::CursorDown => [0xE3, 0xF3],
        }
    }
}

/// `[0xNN]` rendering of a scancode; uppercase hex, no zero padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticText(heapless::String<6>);

impl DiagnosticText {
    pub fn new(scancode: u8) -> Self {
        let mut text = heapless::String::new();
        // "[0xFF]" is the longest possible rendering and fits exactly.
        let _ = write!(text, "[0x{:X}]", scancode);
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// What a non-printable key turns into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Translation {
    Navigation(NavigationKey),
    Unmapped(DiagnosticText),
}

impl Translation {
    pub fn as_bytes(&self) -> TranslationBytes<'_> {
        match self {
            Translation::Navigation(key) => TranslationBytes::Sequence(key.sequence()),
            Translation::Unmapped(text) => TranslationBytes::Text(text.as_bytes()),
        }
    }
}

/// Borrowed byte view of a `Translation`.
pub enum TranslationBytes<'a> {
    Sequence([u8; 2]),
    Text(&'a [u8]),
}

impl TranslationBytes<'_> {
    pub fn as_slice(&self) -> &[u8] {
        match self {
            TranslationBytes::Sequence(seq) => seq,
            TranslationBytes::Text(text) => text,
        }
    }
}

/// Translate a scancode that did not resolve to a character.
pub fn translate(scancode: u8) -> Translation {
    match NavigationKey::from_scancode(scancode) {
        Some(key) => Translation::Navigation(key),
        None => Translation::Unmapped(DiagnosticText::new(scancode)),
    }
}
