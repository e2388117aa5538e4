#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod clock;
pub mod coordinator;
pub mod debounce;
pub mod display;
pub mod error;
pub mod hw;
pub mod report;
pub mod sampler;
pub mod serial;
pub mod signal;

#[cfg(target_os = "none")]
use defmt_rtt as _; // global logger
#[cfg(target_os = "none")]
use panic_probe as _;

use clock::ElapsedClock;
use signal::{SampleSlot, Unit, UnitSelector};

/// Samples captured per conversion block, must be a power of two.
pub const SAMPLE_COUNT: usize = 64;
/// Conversion blocks per second.
pub const SAMPLE_RATE_HZ: u32 = 1;
/// Count rate of the free-running clock timer.
pub const TICK_HZ: u32 = 10_000;
/// Settle window of the unit button, 20 ms.
pub const DEBOUNCE_TICKS: u16 = (TICK_HZ / 50) as u16;
pub const BAUD_RATE: u32 = 9_600;
/// Report buffer capacity including the terminator.
pub const REPORT_LEN: usize = 32;
pub const INTENSITY: u8 = 0x03;

pub type SampleBuffer = [u16; SAMPLE_COUNT];

pub static CLOCK: ElapsedClock = ElapsedClock::new();
pub static SAMPLES: SampleSlot = SampleSlot::new();
pub static UNIT: UnitSelector = UnitSelector::new(Unit::Celsius);

#[cfg(target_os = "none")]
defmt::timestamp!("{=u64}", { CLOCK.ticks(&hw::TickCounter) });
