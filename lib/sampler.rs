use crate::signal::{Sample, SampleSlot, Unit, UnitSelector};

// Sensor output is 10 mV/°C with a 500 mV offset, read by a 10-bit
// converter whose reference is VDDA = 3.3 V. Values are hundredths of a
// degree, so SCALE is the reference in units of 0.1 mV.
pub const SCALE: i32 = 33_000;
pub const FULL_SCALE: i32 = 1_023;
pub const OFFSET: i32 = 5_000;

pub struct Sampler<'a, const LEN: usize> {
    slot: &'a SampleSlot,
    unit: &'a UnitSelector,
    dropped: u32,
}

impl<'a, const LEN: usize> Sampler<'a, LEN> {
    const SHIFT: u32 = {
        assert!(LEN.is_power_of_two());
        LEN.trailing_zeros()
    };

    pub fn new(slot: &'a SampleSlot, unit: &'a UnitSelector) -> Self {
        Sampler {
            slot,
            unit,
            dropped: 0,
        }
    }

    /// Averages a completed block and converts it to the selected unit.
    pub fn convert(&self, buffer: &[u16; LEN]) -> Sample {
        let unit = self.unit.get();
        let raw = self.average(buffer);
        let celsius = to_celsius(raw);
        let value = match unit {
            Unit::Celsius => celsius,
            Unit::Fahrenheit => to_fahrenheit(celsius),
        };
        Sample { value, unit }
    }

    /// Hands the sample to the foreground loop.
    pub fn publish(&mut self, sample: Sample) {
        if self.slot.publish(sample) {
            self.dropped = self.dropped.wrapping_add(1);
            debug!("sample overwritten, {=u32} dropped", self.dropped);
        }
        trace!("sample {=i16} {}", sample.value, sample.unit);
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    fn average(&self, buffer: &[u16; LEN]) -> u16 {
        let sum: u32 = buffer.iter().map(|&raw| u32::from(raw)).sum();
        (sum >> Self::SHIFT) as u16
    }
}

/// Raw 10-bit reading to hundredths of a degree Celsius. Truncates.
pub fn to_celsius(raw: u16) -> i16 {
    let raw = i32::from(raw).min(FULL_SCALE);
    ((raw * SCALE) / FULL_SCALE - OFFSET) as i16
}

/// Hundredths of a degree Celsius to hundredths of a degree Fahrenheit.
/// Truncates, and saturates above the `i16` range.
pub fn to_fahrenheit(celsius: i16) -> i16 {
    (i32::from(celsius) * 9 / 5 + 3200).min(i32::from(i16::MAX)) as i16
}
