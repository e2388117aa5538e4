//! Single-writer state shared between the event handlers and the
//! foreground loop.
//!
//! Every value here fits in one machine word so a reader always sees either
//! the old or the new value. The target has no compare-and-swap, so updates
//! are a plain load followed by a store, which is only sound because each
//! datum has exactly one writing context.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Unit {
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn toggled(self) -> Self {
        match self {
            Unit::Celsius => Unit::Fahrenheit,
            Unit::Fahrenheit => Unit::Celsius,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Unit::Celsius => 'C',
            Unit::Fahrenheit => 'F',
        }
    }
}

/// Display unit flag. Written only by the debounce expiry handler.
pub struct UnitSelector {
    fahrenheit: AtomicBool,
}

impl UnitSelector {
    pub const fn new(unit: Unit) -> Self {
        UnitSelector {
            fahrenheit: AtomicBool::new(matches!(unit, Unit::Fahrenheit)),
        }
    }

    pub fn get(&self) -> Unit {
        if self.fahrenheit.load(Ordering::Acquire) {
            Unit::Fahrenheit
        } else {
            Unit::Celsius
        }
    }

    /// Inverts the selection and returns the new unit.
    pub fn toggle(&self) -> Unit {
        let unit = self.get().toggled();
        self.fahrenheit
            .store(unit == Unit::Fahrenheit, Ordering::Release);
        unit
    }
}

/// Temperature in hundredths of a degree of `unit`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Sample {
    pub value: i16,
    pub unit: Unit,
}

impl Sample {
    const FAHRENHEIT_BIT: u32 = 1 << 16;

    fn pack(self) -> u32 {
        let unit = match self.unit {
            Unit::Celsius => 0,
            Unit::Fahrenheit => Sample::FAHRENHEIT_BIT,
        };
        self.value as u16 as u32 | unit
    }

    fn unpack(word: u32) -> Self {
        let unit = if word & Sample::FAHRENHEIT_BIT != 0 {
            Unit::Fahrenheit
        } else {
            Unit::Celsius
        };
        Sample {
            value: word as u16 as i16,
            unit,
        }
    }
}

/// One-deep mailbox from the sampling handler to the foreground loop.
///
/// The sampling handler writes the value and sets the ready flag; the
/// foreground clears the flag when it consumes the value. A value that is
/// not consumed in time is overwritten, there is no queue.
pub struct SampleSlot {
    word: AtomicU32,
    ready: AtomicBool,
}

impl SampleSlot {
    pub const fn new() -> Self {
        SampleSlot {
            word: AtomicU32::new(0),
            ready: AtomicBool::new(false),
        }
    }

    /// Stores `sample` and raises the ready flag. Returns `true` when an
    /// unconsumed sample was overwritten.
    pub fn publish(&self, sample: Sample) -> bool {
        let dropped = self.ready.load(Ordering::Acquire);
        self.word.store(sample.pack(), Ordering::Relaxed);
        self.ready.store(true, Ordering::Release);
        dropped
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Consumes the pending sample, if any.
    ///
    /// The value is read before the flag is cleared. A publish landing
    /// between the two is dropped, it can never be handed out twice.
    pub fn take(&self) -> Option<Sample> {
        self.take_preempted(|| {})
    }

    /// `take` with `preempt` run at the point where the sampling handler
    /// can interrupt it.
    fn take_preempted<F: FnOnce()>(&self, preempt: F) -> Option<Sample> {
        if !self.ready.load(Ordering::Acquire) {
            return None;
        }
        let sample = Sample::unpack(self.word.load(Ordering::Relaxed));
        preempt();
        self.ready.store(false, Ordering::Release);
        Some(sample)
    }
}

impl Default for SampleSlot {
    fn default() -> Self {
        SampleSlot::new()
    }
}
