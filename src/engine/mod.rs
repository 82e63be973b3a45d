//! Event-to-protocol translation and the main loop body.
//!
//! `Bridge` owns every piece of mutable state the firmware has: the
//! terminal link, the layout (with its lock keys), the keep-alive timer
//! and the configuration. The USB host calls back into it while being
//! pumped; the main loop calls `run_once` once per iteration.


use crate::config::{BridgeConfig, UnmappedKeyPolicy};
use crate::hid::modifiers::{self, ModifierState};
use crate::hid::{KeyEventHandler, KeyboardLayout};
use crate::host::UsbHost;
use crate::joystick::Poller;
use crate::keepalive::KeepAliveTimer;
use crate::link::{self, Clock, TerminalLink};
use crate::protocol::{self, Translation, STARTUP_MARKER};

/// What a key-down turned into on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A printable character; counts as activity.
    Character(u8),
    /// A navigation escape sequence or diagnostic text.
    Translated(Translation),
    /// Unmapped key with `UnmappedKeyPolicy::Drop`.
    Dropped(u8),
}

pub struct Bridge<W, L, C> {
    link: W,
    layout: L,
    clock: C,
    keepalive: KeepAliveTimer,
    config: BridgeConfig,
    host_ready: bool,
}

impl<W, L, C> Bridge<W, L, C>
where
    W: TerminalLink,
    L: KeyboardLayout,
    C: Clock,
{
    /// The keep-alive interval starts counting at construction.
    pub fn new(link: W, layout: L, clock: C, config: BridgeConfig) -> Self {
        let keepalive = KeepAliveTimer::new(clock.now_ms(), config.ping_interval_ms);
        Self {
            link,
            layout,
            clock,
            keepalive,
            config,
            host_ready: false,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn keepalive(&self) -> &KeepAliveTimer {
        &self.keepalive
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn link(&self) -> &W {
        &self.link
    }

    /// Whether the USB host came up. Without it no key events arrive.
    pub fn host_ready(&self) -> bool {
        self.host_ready
    }

    /// Initialize the USB host. Failure is logged, never fatal.
    pub fn init_host<H: UsbHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.host_ready = match host.init() {
            Ok(()) => true,
            Err(e) => {
                error!("{}; running without keyboard", e);
                false
            }
        };
        self.host_ready
    }

    /// Announce ourselves to the terminal.
    pub fn send_startup_marker(&mut self) {
        info!("startup marker");
        link::send(&mut self.link, &[STARTUP_MARKER]);
    }

    /// Send a ping if the link has been quiet for a full interval.
    pub fn service_keepalive(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.keepalive.tick(now, &mut self.link)
    }

    /// One main-loop iteration: pump the keyboard, check the keep-alive,
    /// then poll the joystick.
    pub fn run_once<H, J>(&mut self, host: &mut H, joystick: &mut J)
    where
        H: UsbHost + ?Sized,
        J: Poller + ?Sized,
    {
        if self.host_ready {
            host.pump_once(self);
        }
        self.service_keepalive();
        if self.config.joystick {
            joystick.poll_into(&mut self.link);
        }
    }

    /// Translate one key press and put the result on the wire.
    pub fn key_down(&mut self, modifier: ModifierState, scancode: u8) -> KeyOutcome {
        self.layout.observe_key_down(scancode);

        if let Some(c) = self.layout.resolve(modifier, scancode).filter(|&c| c != 0) {
            debug!("ASCII: {=u8:X}", c);
            link::send(&mut self.link, &[c]);
            self.keepalive.record_activity(self.clock.now_ms());
            return KeyOutcome::Character(c);
        }

        let translation = protocol::translate(scancode);
        if matches!(translation, Translation::Unmapped(_))
            && self.config.unmapped_keys == UnmappedKeyPolicy::Drop
        {
            warn!("unmapped key {=u8:X} dropped", scancode);
            return KeyOutcome::Dropped(scancode);
        }
        link::send(&mut self.link, translation.as_bytes().as_slice());
        KeyOutcome::Translated(translation)
    }
}

impl<W, L, C> KeyEventHandler for Bridge<W, L, C>
where
    W: TerminalLink,
    L: KeyboardLayout,
    C: Clock,
{
    fn on_modifiers_changed(&mut self, before: ModifierState, after: ModifierState) {
        for key in modifiers::diff(before, after) {
            debug!("{} changed", key.name());
        }
    }

    fn on_key_down(&mut self, modifier: ModifierState, scancode: u8) {
        debug!("DN {} >{=u8:X}<", modifier, scancode);
        self.key_down(modifier, scancode);
    }

    fn on_key_up(&mut self, modifier: ModifierState, scancode: u8) {
        debug!("UP {} >{=u8:X}<", modifier, scancode);
    }
}
