use core::fmt::Write;
use heapless::String;

use crate::clock::Elapsed;
use crate::signal::Unit;
use crate::REPORT_LEN;

/// Report text without the terminator.
pub type Report = String<REPORT_LEN>;

/// Four decimal digits of a value in hundredths, `DD.DD`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Digits {
    pub thousands: u8,
    pub hundreds: u8,
    pub tens: u8,
    pub units: u8,
}

impl Digits {
    pub const MAX: i16 = 9_999;

    /// Values outside `0..=9999` saturate, there is no sign position.
    pub fn from_value(value: i16) -> Self {
        let value = value.max(0).min(Digits::MAX) as u16;
        Digits {
            thousands: (value / 1000) as u8,
            hundreds: (value / 100 % 10) as u8,
            tens: (value % 100 / 10) as u8,
            units: (value % 10) as u8,
        }
    }
}

/// Builds `[HH:MM:SS] Temp = DD.DD U\r\n`. Hours wrap at 100.
pub fn format(elapsed: &Elapsed, digits: &Digits, unit: Unit) -> Result<Report, core::fmt::Error> {
    let mut report = Report::new();
    write!(
        &mut report,
        "[{:02}:{:02}:{:02}] Temp = {}{}.{}{} {}\r\n",
        elapsed.hours % 100,
        elapsed.minutes,
        elapsed.seconds,
        digits.thousands,
        digits.hundreds,
        digits.tens,
        digits.units,
        unit.symbol()
    )?;
    Ok(report)
}
