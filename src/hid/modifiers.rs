//! Modifier byte decoding and change detection.
//!
//! Layout of byte 0 of a boot-protocol keyboard report:
//! ```text
//! Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//! Bit 2 = Left Alt,   Bit 3 = Left GUI,
//! Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//! Bit 6 = Right Alt,  Bit 7 = Right GUI
//! ```

use bitflags::bitflags;

bitflags! {
    /// Snapshot of the eight modifier keys.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ModifierState: u8 {
        const LEFT_CTRL   = 0b0000_0001;
        const LEFT_SHIFT  = 0b0000_0010;
        const LEFT_ALT    = 0b0000_0100;
        const LEFT_GUI    = 0b0000_1000;
        const RIGHT_CTRL  = 0b0001_0000;
        const RIGHT_SHIFT = 0b0010_0000;
        const RIGHT_ALT   = 0b0100_0000;
        const RIGHT_GUI   = 0b1000_0000;
    }
}

impl ModifierState {
    /// Decode a raw modifier byte. Every bit is meaningful, so this is total.
    pub const fn from_byte(byte: u8) -> Self {
        Self::from_bits_retain(byte)
    }

    pub fn ctrl(&self) -> bool {
        self.intersects(Self::LEFT_CTRL | Self::RIGHT_CTRL)
    }

    pub fn shift(&self) -> bool {
        self.intersects(Self::LEFT_SHIFT | Self::RIGHT_SHIFT)
    }

    pub fn alt(&self) -> bool {
        self.intersects(Self::LEFT_ALT | Self::RIGHT_ALT)
    }

    pub fn gui(&self) -> bool {
        self.intersects(Self::LEFT_GUI | Self::RIGHT_GUI)
    }

    /// Whether an individual modifier key is held.
    pub fn is_held(&self, key: ModifierKey) -> bool {
        self.contains(key.mask())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ModifierState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{}{}{}{}|{}{}{}{}",
            if self.contains(Self::LEFT_CTRL) { "C" } else { " " },
            if self.contains(Self::LEFT_SHIFT) { "S" } else { " " },
            if self.contains(Self::LEFT_ALT) { "A" } else { " " },
            if self.contains(Self::LEFT_GUI) { "G" } else { " " },
            if self.contains(Self::RIGHT_CTRL) { "C" } else { " " },
            if self.contains(Self::RIGHT_SHIFT) { "S" } else { " " },
            if self.contains(Self::RIGHT_ALT) { "A" } else { " " },
            if self.contains(Self::RIGHT_GUI) { "G" } else { " " },
        )
    }
}

/// One named modifier key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModifierKey {
    LeftCtrl,
    LeftShift,
    LeftAlt,
    LeftGui,
    RightCtrl,
    RightShift,
    RightAlt,
    RightGui,
}

impl ModifierKey {
    /// All keys in bit order (bit 0 first).
    pub const ALL: [ModifierKey; 8] = [
        ModifierKey::LeftCtrl,
        ModifierKey::LeftShift,
        ModifierKey::LeftAlt,
        ModifierKey::LeftGui,
        ModifierKey::RightCtrl,
        ModifierKey::RightShift,
        ModifierKey::RightAlt,
        ModifierKey::RightGui,
    ];

    /// Bit position inside the modifier byte.
    pub const fn bit(self) -> u8 {
        self as u8
    }

    pub const fn mask(self) -> ModifierState {
        ModifierState::from_bits_retain(1 << self.bit())
    }

    pub const fn name(self) -> &'static str {
        match self {
            ModifierKey::LeftCtrl => "LeftCtrl",
            ModifierKey::LeftShift => "LeftShift",
            ModifierKey::LeftAlt => "LeftAlt",
            ModifierKey::LeftGui => "LeftGUI",
            ModifierKey::RightCtrl => "RightCtrl",
            ModifierKey::RightShift => "RightShift",
            ModifierKey::RightAlt => "RightAlt",
            ModifierKey::RightGui => "RightGUI",
        }
    }
}

/// Keys whose state differs between two samples, yielded in bit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModifierChanges {
    changed: ModifierState,
    next_bit: u8,
}

impl ModifierChanges {
    /// Raw mask of changed bits.
    pub fn mask(&self) -> ModifierState {
        self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

impl Iterator for ModifierChanges {
    type Item = ModifierKey;

    fn next(&mut self) -> Option<ModifierKey> {
        while let Some(&key) = ModifierKey::ALL.get(self.next_bit as usize) {
            self.next_bit += 1;
            if self.changed.contains(key.mask()) {
                return Some(key);
            }
        }
        None
    }
}

/// Report which modifier keys changed between `before` and `after`.
pub fn diff(before: ModifierState, after: ModifierState) -> ModifierChanges {
    ModifierChanges {
        changed: before.symmetric_difference(after),
        next_bit: 0,
    }
}
