use stm32g0xx_hal::exti::{Event, ExtiExt, SignalEdge};
use stm32g0xx_hal::hal::digital::v2::InputPin;
use stm32g0xx_hal::stm32g0::stm32g070::EXTI;

use crate::hw::helper::ButtonPin;
use crate::hw::EdgeInput;

const LINE: Event = Event::GPIO13;

/// Unit button on an EXTI line, pressed pulls the pin low.
pub struct Button {
    pin: ButtonPin,
    exti: EXTI,
}

impl Button {
    /// `pin` must already be routed to the EXTI line.
    pub fn new(pin: ButtonPin, exti: EXTI) -> Self {
        Button { pin, exti }
    }

    /// Clears and reports a latched falling edge.
    pub fn take_edge(&mut self) -> bool {
        if !self.exti.is_pending(LINE, SignalEdge::Falling) {
            return false;
        }
        self.exti.unpend(LINE);
        true
    }
}

impl EdgeInput for Button {
    fn disable_edge(&mut self) {
        self.exti.unlisten(LINE);
    }

    fn enable_edge(&mut self) {
        self.exti.unpend(LINE);
        self.exti.listen(LINE, SignalEdge::Falling);
    }

    fn is_asserted(&self) -> bool {
        self.pin.is_low().unwrap_or(false)
    }
}
