use core::convert::Infallible;
use stm32g0xx_hal::hal::blocking::spi::Write;
use stm32g0xx_hal::hal::digital::v2::OutputPin;
use stm32g0xx_hal::spi;

use crate::hw::DigitDriver;

#[derive(Debug)]
pub struct SpiError(pub spi::Error);

/// MAX7219 on a write-only SPI bus. Each register write is one 16-bit
/// frame latched on the rising edge of chip select.
pub struct Max7219<S, CS> {
    spi: S,
    cs: CS,
}

impl<S, CS> Max7219<S, CS>
where
    S: Write<u8, Error = spi::Error>,
    CS: OutputPin<Error = Infallible>,
{
    pub fn new(spi: S, cs: CS) -> Self {
        let mut cs = cs;
        cs.set_high().ok();
        Max7219 { spi, cs }
    }
}

impl<S, CS> DigitDriver for Max7219<S, CS>
where
    S: Write<u8, Error = spi::Error>,
    CS: OutputPin<Error = Infallible>,
{
    type Error = SpiError;

    fn write(&mut self, register: u8, data: u8) -> Result<(), Self::Error> {
        self.cs.set_low().ok();
        let result = self.spi.write(&[register, data]).map_err(SpiError);
        self.cs.set_high().ok();
        result
    }
}
