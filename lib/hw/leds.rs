use stm32g0xx_hal::hal::digital::v2::OutputPin;

use crate::hw::helper::{CelsiusLed, FahrenheitLed};
use crate::hw::UnitIndicator;
use crate::signal::Unit;

pub struct UnitLeds {
    celsius: CelsiusLed,
    fahrenheit: FahrenheitLed,
}

impl UnitLeds {
    pub fn new(celsius: CelsiusLed, fahrenheit: FahrenheitLed) -> Self {
        let mut leds = UnitLeds {
            celsius,
            fahrenheit,
        };
        leds.show(Unit::Celsius);
        leds
    }
}

impl UnitIndicator for UnitLeds {
    fn show(&mut self, unit: Unit) {
        // Push-pull outputs cannot fail
        let (on, off) = match unit {
            Unit::Celsius => (self.celsius.set_high(), self.fahrenheit.set_low()),
            Unit::Fahrenheit => (self.fahrenheit.set_high(), self.celsius.set_low()),
        };
        on.ok();
        off.ok();
    }
}
