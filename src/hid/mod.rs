//! HID boot keyboard side: reports, modifiers, layout and key events.

pub mod keyboard;
pub mod keymap;
pub mod modifiers;


pub use keyboard::{BootReportParser, KeyboardReport};
pub use keymap::{KeyboardLayout, UsBootLayout};
pub use modifiers::{ModifierKey, ModifierState};

/// Receiver of decoded keyboard events.
///
/// Called synchronously from inside `UsbHost::pump_once`.
pub trait KeyEventHandler {
    /// The modifier byte changed between two reports.
    fn on_modifiers_changed(&mut self, _before: ModifierState, _after: ModifierState) {}

    fn on_key_down(&mut self, modifier: ModifierState, scancode: u8);

    fn on_key_up(&mut self, modifier: ModifierState, scancode: u8);
}
