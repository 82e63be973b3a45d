//! USB host transport seam.
//!
//! The nRF52840 has no USB host controller, so the keyboard hangs off a
//! USB-host bridge module that forwards every boot report over a UART:
//!
//! ```text
//! 57 AB  <modifier> <reserved> <key0> .. <key5>  <sum>
//! ```
//!
//! `<sum>` is the low byte of the sum of the ten bytes before it. A frame
//! that fails the check is discarded and its bytes are scanned again for
//! the next sync, so a byte lost on the UART costs one report instead of
//! turning the following sync into key codes.
//!
//! `UartReportHost` reassembles those frames and feeds them through the
//! boot report parser. Anything else implementing `UsbHost` (a native
//! host controller driver, a test double) plugs into the same loop.

use heapless::Deque;

use crate::config::{HOST_RX_QUEUE_LEN, REPORT_FRAME_SYNC};
use crate::error::Error;
use crate::hid::keyboard::{BootReportParser, KeyboardReport, KEYBOARD_REPORT_SIZE};
use crate::hid::KeyEventHandler;

/// Report bytes plus the trailing checksum.
const FRAME_BODY_LEN: usize = KEYBOARD_REPORT_SIZE + 1;

/// Keyboard transport driven from the main loop.
pub trait UsbHost {
    /// Bring the transport up. Called once before the first pump.
    fn init(&mut self) -> Result<(), Error>;

    /// Do one slice of transport work, calling back into `handler` for
    /// every key event it decodes. Must not block.
    fn pump_once(&mut self, handler: &mut dyn KeyEventHandler);
}

/// Checksum byte the bridge module appends to `report`.
pub fn frame_checksum(report: &[u8]) -> u8 {
    REPORT_FRAME_SYNC
        .iter()
        .chain(report)
        .fold(0u8, |sum, &b| sum.wrapping_add(b))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameState {
    Hunt,
    Sync,
    Body(usize),
}

/// Byte-at-a-time reassembly of sync-prefixed, checksummed boot reports.
#[derive(Clone, Debug)]
pub struct ReportFrameReader {
    state: FrameState,
    body: [u8; FRAME_BODY_LEN],
    rejected: u32,
}

impl Default for ReportFrameReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFrameReader {
    pub const fn new() -> Self {
        Self {
            state: FrameState::Hunt,
            body: [0; FRAME_BODY_LEN],
            rejected: 0,
        }
    }

    /// Frames discarded for a bad checksum since start.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Feed one byte; returns a report once a valid frame has arrived.
    pub fn push(&mut self, byte: u8) -> Option<KeyboardReport> {
        match self.state {
            FrameState::Hunt => {
                if byte == REPORT_FRAME_SYNC[0] {
                    self.state = FrameState::Sync;
                }
                None
            }
            FrameState::Sync => {
                self.state = if byte == REPORT_FRAME_SYNC[1] {
                    FrameState::Body(0)
                } else if byte == REPORT_FRAME_SYNC[0] {
                    FrameState::Sync
                } else {
                    trace!("frame resync on {=u8:X}", byte);
                    FrameState::Hunt
                };
                None
            }
            FrameState::Body(n) => {
                self.body[n] = byte;
                if n + 1 < FRAME_BODY_LEN {
                    self.state = FrameState::Body(n + 1);
                    return None;
                }
                self.state = FrameState::Hunt;

                let (report, sum) = self.body.split_at(KEYBOARD_REPORT_SIZE);
                if sum[0] == frame_checksum(report) {
                    return KeyboardReport::from_bytes(report);
                }

                self.rejected = self.rejected.wrapping_add(1);
                warn!("bridge frame checksum mismatch, rescanning");
                // Fewer bytes than a whole frame, so the rescan cannot
                // complete one and never recurses past this level.
                let body = self.body;
                for b in body {
                    self.push(b);
                }
                None
            }
        }
    }
}

/// `UsbHost` backed by a UART-attached bridge module.
///
/// The firmware moves received bytes in with `queue`; `pump_once` then
/// decodes them without touching the hardware.
pub struct UartReportHost {
    reader: ReportFrameReader,
    parser: BootReportParser,
    pending: Deque<u8, HOST_RX_QUEUE_LEN>,
    dropped: u32,
}

impl Default for UartReportHost {
    fn default() -> Self {
        Self::new()
    }
}

impl UartReportHost {
    pub const fn new() -> Self {
        Self {
            reader: ReportFrameReader::new(),
            parser: BootReportParser::new(),
            pending: Deque::new(),
            dropped: 0,
        }
    }

    /// Buffer bytes received from the bridge module. Bytes that do not fit
    /// are dropped; the checksum catches the damaged frame.
    pub fn queue(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.pending.push_back(b).is_err() {
                self.dropped = self.dropped.wrapping_add(1);
                warn!("bridge rx queue full, dropped {=u8:X}", b);
            }
        }
    }

    /// How many more bytes `queue` accepts before dropping.
    pub fn space(&self) -> usize {
        self.pending.capacity() - self.pending.len()
    }

    /// Bytes lost to queue overflow since start.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Frames discarded for a bad checksum since start.
    pub fn rejected_frames(&self) -> u32 {
        self.reader.rejected()
    }
}

impl UsbHost for UartReportHost {
    fn init(&mut self) -> Result<(), Error> {
        self.reader = ReportFrameReader::new();
        self.parser.reset();
        self.pending.clear();
        info!("bridge-module keyboard host ready");
        Ok(())
    }

    fn pump_once(&mut self, handler: &mut dyn KeyEventHandler) {
        while let Some(byte) = self.pending.pop_front() {
            if let Some(report) = self.reader.push(byte) {
                self.parser.parse(&report, handler);
            }
        }
    }
}
