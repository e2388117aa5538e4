//! Elapsed time built from a 16-bit free-running timer and a software
//! overflow count.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::hw::FreeRunningCounter;

const COUNTER_BITS: u32 = 16;

pub struct ElapsedClock {
    overflows: AtomicU32,
}

impl ElapsedClock {
    pub const fn new() -> Self {
        ElapsedClock {
            overflows: AtomicU32::new(0),
        }
    }

    /// Called from the timer overflow handler, the only writer.
    pub fn on_overflow(&self) {
        let overflows = self.overflows.load(Ordering::Relaxed);
        self.overflows
            .store(overflows.wrapping_add(1), Ordering::Release);
    }

    pub fn overflows(&self) -> u32 {
        self.overflows.load(Ordering::Acquire)
    }

    /// Wide tick value `(overflows << 16) | count`.
    ///
    /// The overflow count is read on both sides of the counter read. If it
    /// moved, the counter wrapped in between and is read again so both
    /// halves belong to the same period.
    ///
    /// A caller that outranks the overflow handler can see a wrap the
    /// handler has not counted yet. The counter's pending flag covers that
    /// case; the counter is read again after the flag so it is past the wrap.
    pub fn ticks<C: FreeRunningCounter>(&self, counter: &C) -> u64 {
        let before = self.overflows();
        let mut count = counter.count();
        let mut overflows = self.overflows();
        if before != overflows {
            count = counter.count();
        }
        if counter.overflow_pending() {
            count = counter.count();
            overflows = overflows.wrapping_add(1);
        }
        (u64::from(overflows) << COUNTER_BITS) | u64::from(count)
    }
}

impl Default for ElapsedClock {
    fn default() -> Self {
        ElapsedClock::new()
    }
}

/// Time since power-on, no calendar semantics.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Elapsed {
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
}

impl Elapsed {
    pub fn from_ticks(ticks: u64, tick_hz: u32) -> Self {
        let total = ticks / u64::from(tick_hz);
        Elapsed {
            hours: (total / 3600) as u32,
            minutes: ((total % 3600) / 60) as u8,
            seconds: (total % 60) as u8,
        }
    }
}
