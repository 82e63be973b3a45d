//! Keyboard layout: scancode + modifiers → ASCII.
//!
//! `UsBootLayout` covers the printable part of a US keyboard, the way a
//! boot-protocol host usually does it. Anything it does not know about
//! resolves to `None` and is left to the scancode translator.

use super::modifiers::ModifierState;

/// Caps Lock usage code.
pub const KEY_CAPS_LOCK: u8 = 0x39;
/// Num Lock usage code.
pub const KEY_NUM_LOCK: u8 = 0x53;

const KEY_A: u8 = 0x04;
const KEY_Z: u8 = 0x1D;
const KEY_1: u8 = 0x1E;
const KEY_0: u8 = 0x27;
const KEY_ENTER: u8 = 0x28;
const KEY_SPACE: u8 = 0x2C;
const KEY_MINUS: u8 = 0x2D;
const KEY_SLASH: u8 = 0x38;
const KEY_PAD_SLASH: u8 = 0x54;
const KEY_PAD_ENTER: u8 = 0x58;
const KEY_PAD_1: u8 = 0x59;
const KEY_PAD_0: u8 = 0x62;
const KEY_PAD_PERIOD: u8 = 0x63;

/// Shifted forms of `1`..`9`.
const SHIFTED_DIGITS: &[u8; 9] = b"!@#$%^&*(";

/// 0x2D..=0x38, unshifted and shifted. 0x32 (non-US `#`) has no mapping.
const SYMBOLS_LO: &[u8; 12] = b"-=[]\\\0;'`,./";
const SYMBOLS_HI: &[u8; 12] = b"_+{}|\0:\"~<>?";

/// Keypad `/ * - + Enter`.
const PAD_OPERATORS: &[u8; 5] = b"/*-+\r";

/// Resolves a key press to a character, if it has one.
pub trait KeyboardLayout {
    /// ASCII byte for `scancode` under `modifier`, or `None` for
    /// non-printable keys.
    fn resolve(&self, modifier: ModifierState, scancode: u8) -> Option<u8>;

    /// Called for every key-down before `resolve`, so layouts can track
    /// locking keys.
    fn observe_key_down(&mut self, _scancode: u8) {}
}

/// US layout with Caps Lock and Num Lock handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsBootLayout {
    caps_lock: bool,
    num_lock: bool,
}

impl UsBootLayout {
    /// Both locks off.
    pub const fn new() -> Self {
        Self {
            caps_lock: false,
            num_lock: false,
        }
    }

    pub fn caps_lock(&self) -> bool {
        self.caps_lock
    }

    pub fn num_lock(&self) -> bool {
        self.num_lock
    }
}

impl KeyboardLayout for UsBootLayout {
    fn resolve(&self, modifier: ModifierState, scancode: u8) -> Option<u8> {
        let shift = modifier.shift();
        let c = match scancode {
            KEY_A..=KEY_Z => {
                let base = b'a' + (scancode - KEY_A);
                if shift != self.caps_lock {
                    base.to_ascii_uppercase()
                } else {
                    base
                }
            }
            KEY_0 => {
                if shift {
                    b')'
                } else {
                    b'0'
                }
            }
            KEY_1..=0x26 => {
                let idx = (scancode - KEY_1) as usize;
                if shift {
                    SHIFTED_DIGITS[idx]
                } else {
                    b'1' + idx as u8
                }
            }
            KEY_ENTER => b'\r',
            KEY_SPACE => b' ',
            KEY_MINUS..=KEY_SLASH => {
                let idx = (scancode - KEY_MINUS) as usize;
                if shift {
                    SYMBOLS_HI[idx]
                } else {
                    SYMBOLS_LO[idx]
                }
            }
            KEY_PAD_SLASH..=KEY_PAD_ENTER => PAD_OPERATORS[(scancode - KEY_PAD_SLASH) as usize],
            KEY_PAD_1..=0x61 if self.num_lock => b'1' + (scancode - KEY_PAD_1),
            KEY_PAD_0 if self.num_lock => b'0',
            KEY_PAD_PERIOD if self.num_lock => b'.',
            _ => return None,
        };
        (c != 0).then_some(c)
    }

    fn observe_key_down(&mut self, scancode: u8) {
        match scancode {
            KEY_CAPS_LOCK => {
                self.caps_lock = !self.caps_lock;
                debug!("caps lock {}", self.caps_lock);
            }
            KEY_NUM_LOCK => {
                self.num_lock = !self.num_lock;
                debug!("num lock {}", self.num_lock);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: ModifierState = ModifierState::empty();
    const SHIFT: ModifierState = ModifierState::LEFT_SHIFT;

    #[test]
    fn letters_follow_shift() {
        let layout = UsBootLayout::new();
        assert_eq!(layout.resolve(NONE, 0x04), Some(b'a'));
        assert_eq!(layout.resolve(SHIFT, 0x04), Some(b'A'));
        assert_eq!(layout.resolve(ModifierState::RIGHT_SHIFT, 0x1D), Some(b'Z'));
    }

    #[test]
    fn caps_lock_inverts_shift_for_letters_only() {
        let mut layout = UsBootLayout::new();
        layout.observe_key_down(KEY_CAPS_LOCK);
        assert!(layout.caps_lock());
        assert_eq!(layout.resolve(NONE, 0x05), Some(b'B'));
        assert_eq!(layout.resolve(SHIFT, 0x05), Some(b'b'));
        assert_eq!(layout.resolve(NONE, 0x1E), Some(b'1'));

        layout.observe_key_down(KEY_CAPS_LOCK);
        assert_eq!(layout.resolve(NONE, 0x05), Some(b'b'));
    }

    #[test]
    fn digit_row() {
        let layout = UsBootLayout::new();
        assert_eq!(layout.resolve(NONE, 0x1E), Some(b'1'));
        assert_eq!(layout.resolve(NONE, 0x26), Some(b'9'));
        assert_eq!(layout.resolve(NONE, 0x27), Some(b'0'));
        assert_eq!(layout.resolve(SHIFT, 0x1E), Some(b'!'));
        assert_eq!(layout.resolve(SHIFT, 0x26), Some(b'('));
        assert_eq!(layout.resolve(SHIFT, 0x27), Some(b')'));
    }

    #[test]
    fn symbols_and_whitespace() {
        let layout = UsBootLayout::new();
        assert_eq!(layout.resolve(NONE, 0x28), Some(b'\r'));
        assert_eq!(layout.resolve(NONE, 0x2C), Some(b' '));
        assert_eq!(layout.resolve(NONE, 0x2D), Some(b'-'));
        assert_eq!(layout.resolve(SHIFT, 0x2D), Some(b'_'));
        assert_eq!(layout.resolve(NONE, 0x31), Some(b'\\'));
        assert_eq!(layout.resolve(SHIFT, 0x34), Some(b'"'));
        assert_eq!(layout.resolve(NONE, 0x38), Some(b'/'));
        assert_eq!(layout.resolve(SHIFT, 0x38), Some(b'?'));
        assert_eq!(layout.resolve(NONE, 0x32), None);
    }

    #[test]
    fn keypad_digits_need_num_lock() {
        let mut layout = UsBootLayout::new();
        assert_eq!(layout.resolve(NONE, 0x59), None);
        assert_eq!(layout.resolve(NONE, 0x55), Some(b'*'));
        assert_eq!(layout.resolve(NONE, 0x58), Some(b'\r'));

        layout.observe_key_down(KEY_NUM_LOCK);
        assert_eq!(layout.resolve(NONE, 0x59), Some(b'1'));
        assert_eq!(layout.resolve(NONE, 0x61), Some(b'9'));
        assert_eq!(layout.resolve(NONE, 0x62), Some(b'0'));
        assert_eq!(layout.resolve(NONE, 0x63), Some(b'.'));
    }

    #[test]
    fn navigation_and_control_keys_are_unresolved() {
        let layout = UsBootLayout::new();
        for code in [0x00, 0x29, 0x2A, 0x2B, 0x39, 0x3A, 0x4B, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0xE0] {
            assert_eq!(layout.resolve(NONE, code), None, "scancode {:#04x}", code);
        }
    }

    #[test]
    fn ctrl_alt_gui_do_not_change_resolution() {
        let layout = UsBootLayout::new();
        let noisy = ModifierState::LEFT_CTRL | ModifierState::RIGHT_ALT | ModifierState::LEFT_GUI;
        assert_eq!(layout.resolve(noisy, 0x04), Some(b'a'));
    }
}
