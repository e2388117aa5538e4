use crate::error::{Error, Result};
use crate::hw::DigitDriver;
use crate::report::Digits;
use crate::signal::Unit;
use crate::INTENSITY;

pub struct Display<D, DE>
where
    D: DigitDriver<Error = DE>,
{
    driver: D,
}

impl<D, DE> Display<D, DE>
where
    D: DigitDriver<Error = DE>,
{
    pub fn new(driver: D) -> Result<Self, DE> {
        let mut display = Display { driver };
        display.init()?;
        Ok(display)
    }

    /// Unit glyph, then thousands to units with the decimal point after
    /// the hundreds digit.
    pub fn show(&mut self, digits: &Digits, unit: Unit) -> Result<(), DE> {
        let glyph = match unit {
            Unit::Celsius => Glyph::CELSIUS,
            Unit::Fahrenheit => Glyph::FAHRENHEIT,
        };
        self.write(Register::DIGIT0, glyph)?;
        self.write(Register::DIGIT5, digits.thousands)?;
        self.write(Register::DIGIT4, digits.hundreds | Glyph::DECIMAL_POINT)?;
        self.write(Register::DIGIT3, digits.tens)?;
        self.write(Register::DIGIT2, digits.units)?;
        Ok(())
    }

    fn init(&mut self) -> Result<(), DE> {
        self.write(Register::DISPLAY_TEST, 0x00)?;
        self.write(Register::SHUTDOWN, 0x01)?;
        self.write(Register::SCAN_LIMIT, 0x05)?;
        self.write(Register::DECODE_MODE, Decode::DIGITS)?;
        self.write(Register::INTENSITY, INTENSITY)?;
        for register in Register::DIGIT0..=Register::DIGIT7 {
            self.write(register, Glyph::BLANK)?;
        }
        Ok(())
    }

    fn write(&mut self, register: u8, data: u8) -> Result<(), DE> {
        self.driver.write(register, data).map_err(Error::Display)
    }
}

struct Register;

impl Register {
    const DIGIT0: u8 = 0x01;
    const DIGIT2: u8 = 0x03;
    const DIGIT3: u8 = 0x04;
    const DIGIT4: u8 = 0x05;
    const DIGIT5: u8 = 0x06;
    const DIGIT7: u8 = 0x08;
    const DECODE_MODE: u8 = 0x09;
    const INTENSITY: u8 = 0x0A;
    const SCAN_LIMIT: u8 = 0x0B;
    const SHUTDOWN: u8 = 0x0C;
    const DISPLAY_TEST: u8 = 0x0F;
}

struct Decode;

impl Decode {
    // Code B on DIGIT1..DIGIT5, raw segments on DIGIT0
    const DIGITS: u8 = 0b0011_1110;
}

struct Glyph;

impl Glyph {
    // Raw segments, DP A B C D E F G
    const CELSIUS: u8 = 0b0100_1110;
    const FAHRENHEIT: u8 = 0b0100_0111;
    // Code B
    const BLANK: u8 = 0x0F;
    const DECIMAL_POINT: u8 = 0x80;
}
