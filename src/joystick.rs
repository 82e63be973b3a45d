//! Digital joystick port.
//!
//! Five switches (button 1 and four directions), each wired active-low
//! against the internal pull-up. Every poll packs them into one byte:
//!
//! ```text
//! bit 7..5  101   framing marker
//! bit 4     button 1
//! bit 3     up
//! bit 2     right
//! bit 1     down
//! bit 0     left
//! ```
//!
//! A change is reported as `80 <state>`; unchanged polls are silent.

use bitflags::bitflags;
use embedded_hal::digital::InputPin;

use crate::link::{self, TerminalLink};
use crate::protocol::JOYSTICK_MARKER;

bitflags! {
    /// Logical (pressed = set) switch state.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct JoystickButtons: u8 {
        const LEFT    = 0b0_0001;
        const DOWN    = 0b0_0010;
        const RIGHT   = 0b0_0100;
        const UP      = 0b0_1000;
        const BUTTON1 = 0b1_0000;
    }
}

/// One packed joystick status byte, always `101BBBBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickState(u8);

impl JoystickState {
    pub const MARKER_BITS: u8 = 0b1010_0000;
    pub const MARKER_MASK: u8 = 0b1110_0000;

    /// Nothing pressed.
    pub const IDLE: Self = Self(Self::MARKER_BITS);

    pub const fn from_buttons(buttons: JoystickButtons) -> Self {
        Self(Self::MARKER_BITS | buttons.bits())
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn buttons(self) -> JoystickButtons {
        JoystickButtons::from_bits_truncate(self.0)
    }
}

impl Default for JoystickState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// The five input lines of one joystick.
pub struct JoystickPins<P> {
    pub button1: P,
    pub up: P,
    pub down: P,
    pub left: P,
    pub right: P,
}

impl<P: InputPin> JoystickPins<P> {
    /// Read all lines and invert them into logical button state.
    pub fn read(&mut self) -> JoystickButtons {
        let mut buttons = JoystickButtons::empty();
        buttons.set(JoystickButtons::BUTTON1, is_pressed(&mut self.button1));
        buttons.set(JoystickButtons::UP, is_pressed(&mut self.up));
        buttons.set(JoystickButtons::RIGHT, is_pressed(&mut self.right));
        buttons.set(JoystickButtons::DOWN, is_pressed(&mut self.down));
        buttons.set(JoystickButtons::LEFT, is_pressed(&mut self.left));
        buttons
    }
}

/// Active-low: a low line means pressed. A failed read counts as released.
fn is_pressed<P: InputPin>(pin: &mut P) -> bool {
    pin.is_low().unwrap_or(false)
}

/// Sample-and-hold filter: a value is accepted once it was seen `depth`
/// times in a row. Depth 0 or 1 passes every sample through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debouncer {
    depth: u8,
    candidate: JoystickState,
    streak: u8,
}

impl Debouncer {
    pub const fn new(depth: u8) -> Self {
        Self {
            depth,
            candidate: JoystickState::IDLE,
            streak: 0,
        }
    }

    pub fn accept(&mut self, sample: JoystickState) -> Option<JoystickState> {
        if self.depth <= 1 {
            return Some(sample);
        }
        if sample == self.candidate {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.candidate = sample;
            self.streak = 1;
        }
        (self.streak >= self.depth).then_some(self.candidate)
    }
}

/// Polls one joystick and reports state changes on the terminal link.
pub struct JoystickEncoder<P> {
    pins: JoystickPins<P>,
    last_sent: JoystickState,
    debouncer: Debouncer,
}

impl<P: InputPin> JoystickEncoder<P> {
    /// `debounce_samples` of 1 reports every level change immediately.
    pub fn new(pins: JoystickPins<P>, debounce_samples: u8) -> Self {
        Self {
            pins,
            last_sent: JoystickState::IDLE,
            debouncer: Debouncer::new(debounce_samples),
        }
    }

    /// The last state byte put on the wire (initially idle).
    pub fn last_sent(&self) -> JoystickState {
        self.last_sent
    }

    /// Sample the pins and send `80 <state>` if the state changed.
    /// Returns the freshly sampled state.
    pub fn poll<W: TerminalLink + ?Sized>(&mut self, link: &mut W) -> JoystickState {
        let sampled = JoystickState::from_buttons(self.pins.read());
        if let Some(stable) = self.debouncer.accept(sampled) {
            if stable != self.last_sent {
                self.last_sent = stable;
                link::send(link, &[JOYSTICK_MARKER, stable.bits()]);
                debug!("joystick {=u8:b}", stable.bits());
            }
        }
        sampled
    }
}

/// Something the main loop polls once per iteration after the keyboard.
pub trait Poller {
    fn poll_into(&mut self, link: &mut dyn TerminalLink);
}

impl<P: InputPin> Poller for JoystickEncoder<P> {
    fn poll_into(&mut self, link: &mut dyn TerminalLink) {
        self.poll(link);
    }
}

impl<T: Poller> Poller for Option<T> {
    fn poll_into(&mut self, link: &mut dyn TerminalLink) {
        if let Some(inner) = self {
            inner.poll_into(link);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Shared electrical level; `true` = high (released).
    #[derive(Clone)]
    struct FakePin(Rc<Cell<bool>>);

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    struct Rig {
        button1: Rc<Cell<bool>>,
        up: Rc<Cell<bool>>,
        down: Rc<Cell<bool>>,
        left: Rc<Cell<bool>>,
        right: Rc<Cell<bool>>,
    }

    impl Rig {
        fn new() -> (Self, JoystickPins<FakePin>) {
            let line = || Rc::new(Cell::new(true));
            let rig = Rig {
                button1: line(),
                up: line(),
                down: line(),
                left: line(),
                right: line(),
            };
            let pins = JoystickPins {
                button1: FakePin(rig.button1.clone()),
                up: FakePin(rig.up.clone()),
                down: FakePin(rig.down.clone()),
                left: FakePin(rig.left.clone()),
                right: FakePin(rig.right.clone()),
            };
            (rig, pins)
        }
    }

    #[test]
    fn idle_stick_sends_nothing() {
        let (_rig, pins) = Rig::new();
        let mut enc = JoystickEncoder::new(pins, 1);
        let mut out: Vec<u8> = Vec::new();
        assert_eq!(enc.poll(&mut out), JoystickState::IDLE);
        assert_eq!(enc.poll(&mut out).bits(), 0b1010_0000);
        assert!(out.is_empty());
    }

    #[test]
    fn bit_order_follows_wire_format() {
        let (rig, pins) = Rig::new();
        let mut enc = JoystickEncoder::new(pins, 1);
        let mut out: Vec<u8> = Vec::new();

        rig.button1.set(false);
        assert_eq!(enc.poll(&mut out).bits(), 0b1011_0000);
        rig.button1.set(true);
        rig.up.set(false);
        assert_eq!(enc.poll(&mut out).bits(), 0b1010_1000);
        rig.up.set(true);
        rig.right.set(false);
        assert_eq!(enc.poll(&mut out).bits(), 0b1010_0100);
        rig.right.set(true);
        rig.down.set(false);
        assert_eq!(enc.poll(&mut out).bits(), 0b1010_0010);
        rig.down.set(true);
        rig.left.set(false);
        assert_eq!(enc.poll(&mut out).bits(), 0b1010_0001);
    }

    #[test]
    fn change_is_sent_once_with_marker() {
        let (rig, pins) = Rig::new();
        let mut enc = JoystickEncoder::new(pins, 1);
        let mut out: Vec<u8> = Vec::new();

        rig.up.set(false);
        rig.button1.set(false);
        enc.poll(&mut out);
        enc.poll(&mut out);
        assert_eq!(out, [0x80, 0b1011_1000]);

        rig.up.set(true);
        rig.button1.set(true);
        enc.poll(&mut out);
        assert_eq!(out, [0x80, 0b1011_1000, 0x80, 0b1010_0000]);
        assert_eq!(enc.last_sent(), JoystickState::IDLE);
    }

    #[test]
    fn marker_bits_always_present() {
        for bits in 0..32u8 {
            let state = JoystickState::from_buttons(JoystickButtons::from_bits_truncate(bits));
            assert_eq!(state.bits() & JoystickState::MARKER_MASK, JoystickState::MARKER_BITS);
            assert_eq!(state.buttons().bits(), bits);
        }
    }

    #[test]
    fn scripted_sequence_only_reports_transitions() {
        let (rig, pins) = Rig::new();
        let mut enc = JoystickEncoder::new(pins, 1);
        let mut out: Vec<u8> = Vec::new();

        // left level per poll: low = pressed
        let script = [true, false, false, true, true, false, true];
        for level in script {
            rig.left.set(level);
            enc.poll(&mut out);
        }
        assert_eq!(
            out,
            [0x80, 0xA1, 0x80, 0xA0, 0x80, 0xA1, 0x80, 0xA0]
        );
        assert!(out.chunks(2).all(|m| m[0] == 0x80 && m[1] & 0xE0 == 0xA0));
    }

    #[test]
    fn debouncing_suppresses_single_sample_glitches() {
        let (rig, pins) = Rig::new();
        let mut enc = JoystickEncoder::new(pins, 3);
        let mut out: Vec<u8> = Vec::new();

        rig.down.set(false);
        enc.poll(&mut out);
        rig.down.set(true);
        enc.poll(&mut out);
        assert!(out.is_empty());

        rig.down.set(false);
        enc.poll(&mut out);
        enc.poll(&mut out);
        assert!(out.is_empty());
        enc.poll(&mut out);
        assert_eq!(out, [0x80, 0xA2]);

        enc.poll(&mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn option_poller_skips_disabled_joystick() {
        let mut none: Option<JoystickEncoder<FakePin>> = None;
        let mut out: Vec<u8> = Vec::new();
        none.poll_into(&mut out);
        assert!(out.is_empty());

        let (rig, pins) = Rig::new();
        let mut some = Some(JoystickEncoder::new(pins, 1));
        rig.right.set(false);
        some.poll_into(&mut out);
        assert_eq!(out, [0x80, 0xA4]);
    }
}
