use crate::signal::Unit;

#[cfg(target_os = "none")]
mod adc;
#[cfg(target_os = "none")]
mod button;
#[cfg(target_os = "none")]
mod helper;
#[cfg(target_os = "none")]
mod leds;
#[cfg(target_os = "none")]
mod max7219;
#[cfg(target_os = "none")]
mod serial;
#[cfg(target_os = "none")]
mod timers;

#[cfg(target_os = "none")]
pub use adc::AdcConfig;
#[cfg(target_os = "none")]
pub use button::Button;
#[cfg(target_os = "none")]
pub use helper::*;
#[cfg(target_os = "none")]
pub use leds::UnitLeds;
#[cfg(target_os = "none")]
pub use max7219::SpiError;
#[cfg(target_os = "none")]
pub use serial::SerialTx;
#[cfg(target_os = "none")]
pub use timers::{TickCounter, TickTimer};

/// Register-level access to the digit display controller.
pub trait DigitDriver {
    type Error;
    /// Writes `data` to `register`, returns once the transfer is complete.
    fn write(&mut self, register: u8, data: u8) -> Result<(), Self::Error>;
}

pub trait UnitIndicator {
    fn show(&mut self, unit: Unit);
}

/// Read side of the free-running clock timer.
pub trait FreeRunningCounter {
    fn count(&self) -> u16;

    /// The counter wrapped and the overflow handler has not run yet.
    fn overflow_pending(&self) -> bool {
        false
    }
}

/// Compare channel of the free-running clock timer, used as a one-shot.
pub trait CompareTimer {
    fn now(&self) -> u16;
    fn arm(&mut self, deadline: u16);
    fn disarm(&mut self);
}

/// Edge-triggered, active-low digital input.
pub trait EdgeInput {
    fn disable_edge(&mut self);
    /// Clears any latched edge and re-enables detection.
    fn enable_edge(&mut self);
    fn is_asserted(&self) -> bool;
}

/// Serial transmitter with a transmit-complete interrupt.
pub trait Transmitter {
    fn write(&mut self, byte: u8);
    fn listen(&mut self);
    fn unlisten(&mut self);
}

/// Write value for a 16-bit write-zero-to-clear status register that
/// clears `flags` and leaves every other flag as the hardware set it.
pub const fn clear_mask(flags: u32) -> u32 {
    0xFFFF & !flags
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write-zero-to-clear semantics: a written 1 has no effect.
    fn write_status(status: u32, value: u32) -> u32 {
        status & value
    }

    #[test]
    fn clearing_one_flag_keeps_the_others() {
        const UPDATE: u32 = 1 << 0;
        const COMPARE1: u32 = 1 << 1;

        // Compare raised by hardware after the update flag was read
        let status = UPDATE | COMPARE1;
        assert_eq!(write_status(status, clear_mask(UPDATE)), COMPARE1);
        assert_eq!(write_status(status, clear_mask(COMPARE1)), UPDATE);
        assert_eq!(write_status(status, clear_mask(UPDATE | COMPARE1)), 0);
    }
}
