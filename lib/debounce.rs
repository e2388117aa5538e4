//! Unit button debouncing.
//!
//! The first edge disables edge detection and arms a one-shot compare on
//! the clock timer. When the compare fires the line is sampled once more;
//! only a line that is still asserted toggles the display unit.

use crate::hw::{CompareTimer, EdgeInput};
use crate::signal::{Unit, UnitSelector};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Debouncing { deadline: u16 },
}

pub struct Debouncer<'a> {
    state: State,
    window: u16,
    unit: &'a UnitSelector,
}

impl<'a> Debouncer<'a> {
    pub fn new(window: u16, unit: &'a UnitSelector) -> Self {
        Debouncer {
            state: State::Idle,
            window,
            unit,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Edge interrupt.
    pub fn on_edge<I, T>(&mut self, input: &mut I, timer: &mut T)
    where
        I: EdgeInput,
        T: CompareTimer,
    {
        input.disable_edge();
        if self.state != State::Idle {
            return;
        }
        let deadline = timer.now().wrapping_add(self.window);
        timer.arm(deadline);
        self.state = State::Debouncing { deadline };
        trace!("debounce armed until {=u16}", deadline);
    }

    /// Compare interrupt. Returns the newly selected unit when the press
    /// was confirmed.
    pub fn on_expiry<I, T>(&mut self, input: &mut I, timer: &mut T) -> Option<Unit>
    where
        I: EdgeInput,
        T: CompareTimer,
    {
        timer.disarm();
        if self.state == State::Idle {
            return None;
        }
        self.state = State::Idle;

        let toggled = if input.is_asserted() {
            let unit = self.unit.toggle();
            info!("display unit {}", unit);
            Some(unit)
        } else {
            debug!("bounce rejected");
            None
        };
        input.enable_edge();
        toggled
    }
}
