//! hid2term firmware - USB boot keyboard (and joystick) to serial terminal.
//!
//! Architecture:
//! - One UARTE drives the terminal at `TERMINAL_BAUD`.
//! - The other UARTE receives framed boot reports from the USB-host
//!   bridge module at 9600 baud into an interrupt-fed ring buffer, so
//!   blocking terminal writes never starve reception.
//! - A single cooperative loop pumps received bytes through the
//!   `Bridge`, which handles translation, keep-alive and joystick polling.
//!
//! The library crate holds all logic; this file only wires peripherals.
//! The `joystick` feature selects both `config::BRIDGE` and the UARTE
//! instance assignment below.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_nrf::buffered_uarte::{self, BufferedUarteRx};
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::uarte::{self, UarteTx};
use embassy_nrf::{bind_interrupts, peripherals, timer};
use embassy_time::{with_timeout, Duration, Instant, Timer};
use hid2term::config::{self, TerminalPort};
use hid2term::{
    Bridge, Clock, Error, JoystickEncoder, JoystickPins, TerminalLink, UartReportHost,
    UsBootLayout,
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

// Keyboard-only image: terminal on UARTE0, bridge module on UARTE1.
#[cfg(not(feature = "joystick"))]
bind_interrupts!(struct Irqs {
    UARTE0_UART0 => uarte::InterruptHandler<peripherals::UARTE0>;
    UARTE1 => buffered_uarte::InterruptHandler<peripherals::UARTE1>;
});

#[cfg(not(feature = "joystick"))]
const _: () = assert!(matches!(config::BRIDGE.terminal_port, TerminalPort::Uarte0));

// Joystick image: terminal on UARTE1, bridge module on UARTE0.
#[cfg(feature = "joystick")]
bind_interrupts!(struct Irqs {
    UARTE0_UART0 => buffered_uarte::InterruptHandler<peripherals::UARTE0>;
    UARTE1 => uarte::InterruptHandler<peripherals::UARTE1>;
});

#[cfg(feature = "joystick")]
const _: () = assert!(matches!(config::BRIDGE.terminal_port, TerminalPort::Uarte1));

/// Ring buffer for bytes from the bridge module (~260 ms at 9600 baud).
static BRIDGE_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Joystick encoder over the board's GPIO inputs; `None` in the
/// keyboard-only image.
type Joystick = Option<JoystickEncoder<Input<'static>>>;

/// Terminal side of the link: a transmit-only UARTE.
struct UarteLink<'d, T: uarte::Instance> {
    tx: UarteTx<'d, T>,
}

impl<T: uarte::Instance> TerminalLink for UarteLink<'_, T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.tx.blocking_write(bytes).map_err(|_| Error::Link)
    }
}

/// Milliseconds since boot from the Embassy time driver.
struct Uptime;

impl Clock for Uptime {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

fn terminal_config() -> uarte::Config {
    let mut cfg = uarte::Config::default();
    cfg.parity = uarte::Parity::EXCLUDED;
    cfg.baudrate = uarte::Baudrate::from_bits(config::uarte_baudrate(config::TERMINAL_BAUD));
    cfg
}

fn bridge_module_config() -> uarte::Config {
    let mut cfg = uarte::Config::default();
    cfg.parity = uarte::Parity::EXCLUDED;
    cfg.baudrate = uarte::Baudrate::BAUD9600;
    cfg
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("hid2term starting, {}", config::BRIDGE);

    let joystick: Joystick = if config::BRIDGE.joystick {
        let pins = JoystickPins {
            button1: Input::new(p.P1_01, Pull::Up),
            up: Input::new(p.P1_02, Pull::Up),
            down: Input::new(p.P1_03, Pull::Up),
            left: Input::new(p.P1_04, Pull::Up),
            right: Input::new(p.P1_05, Pull::Up),
        };
        Some(JoystickEncoder::new(
            pins,
            config::BRIDGE.joystick_debounce_samples,
        ))
    } else {
        None
    };

    let rx_buf = BRIDGE_RX_BUF.init([0u8; 256]);

    #[cfg(not(feature = "joystick"))]
    let (tx, rx) = (
        UarteTx::new(p.UARTE0, Irqs, p.P0_06, terminal_config()),
        BufferedUarteRx::new(
            p.UARTE1,
            p.TIMER1,
            p.PPI_CH0,
            p.PPI_CH1,
            p.PPI_GROUP0,
            Irqs,
            p.P0_08,
            bridge_module_config(),
            rx_buf,
        ),
    );

    #[cfg(feature = "joystick")]
    let (tx, rx) = (
        UarteTx::new(p.UARTE1, Irqs, p.P0_06, terminal_config()),
        BufferedUarteRx::new(
            p.UARTE0,
            p.TIMER1,
            p.PPI_CH0,
            p.PPI_CH1,
            p.PPI_GROUP0,
            Irqs,
            p.P0_08,
            bridge_module_config(),
            rx_buf,
        ),
    );

    run(tx, rx, joystick).await
}

async fn run<T, U, C>(
    tx: UarteTx<'static, T>,
    mut rx: BufferedUarteRx<'static, U, C>,
    mut joystick: Joystick,
) -> !
where
    T: uarte::Instance,
    U: uarte::Instance,
    C: timer::Instance,
{
    let mut bridge = Bridge::new(UarteLink { tx }, UsBootLayout::new(), Uptime, config::BRIDGE);
    let mut host = UartReportHost::new();

    bridge.init_host(&mut host);
    Timer::after(Duration::from_millis(config::STARTUP_DELAY_MS)).await;
    bridge.send_startup_marker();

    let tick = Duration::from_millis(config::LOOP_TICK_MS);
    loop {
        // Wait at most one tick for bridge bytes so the keep-alive and
        // the joystick keep running while the keyboard is idle.
        match with_timeout(tick, rx.fill_buf()).await {
            Ok(Ok(bytes)) => {
                let n = bytes.len().min(host.space());
                host.queue(&bytes[..n]);
                rx.consume(n);
            }
            Ok(Err(_)) => warn!("bridge module rx error"),
            Err(_) => {}
        }
        bridge.run_once(&mut host, &mut joystick);
    }
}
