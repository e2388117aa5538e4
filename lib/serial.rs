//! Interrupt-driven report transmission.
//!
//! There is a single report buffer. The foreground may only fill it while
//! the pipeline is idle; from then on the transmit-complete handler owns it
//! and pushes one byte per interrupt until it reaches the terminator.

use crate::hw::Transmitter;

const TERMINATOR: u8 = b'\0';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Dispatch {
    Started,
    /// A report is still draining; the new one was dropped.
    Busy,
    /// Nothing to send.
    Empty,
}

pub struct TxPipeline<T, const LEN: usize> {
    tx: T,
    buffer: [u8; LEN],
    index: usize,
    busy: bool,
}

impl<T, const LEN: usize> TxPipeline<T, LEN>
where
    T: Transmitter,
{
    pub fn new(tx: T) -> Self {
        TxPipeline {
            tx,
            buffer: [TERMINATOR; LEN],
            index: 0,
            busy: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Position of the next byte to transmit.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Buffered report up to the terminator.
    pub fn report(&self) -> &[u8] {
        let len = self
            .buffer
            .iter()
            .position(|&byte| byte == TERMINATOR)
            .unwrap_or(LEN);
        &self.buffer[..len]
    }

    /// Copies `report` in, truncated to `LEN - 1` bytes, and sends the
    /// first byte. Leaves everything untouched while busy.
    pub fn start(&mut self, report: &[u8]) -> Dispatch {
        if self.busy {
            return Dispatch::Busy;
        }
        let len = report.len().min(LEN - 1);
        if len == 0 || report[0] == TERMINATOR {
            return Dispatch::Empty;
        }
        self.buffer[..len].copy_from_slice(&report[..len]);
        self.buffer[len] = TERMINATOR;
        self.busy = true;

        self.tx.write(self.buffer[0]);
        self.index = 1;
        self.tx.listen();
        Dispatch::Started
    }

    /// Transmit-complete interrupt.
    pub fn on_complete(&mut self) {
        if !self.busy {
            self.tx.unlisten();
            return;
        }
        let byte = self.buffer[self.index];
        if byte == TERMINATOR {
            self.tx.unlisten();
            self.index = 0;
            self.busy = false;
        } else {
            self.tx.write(byte);
            self.index += 1;
        }
    }
}
