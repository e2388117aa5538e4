//! Foreground work: turns a published sample into display writes and a
//! serial report.

use crate::clock::{Elapsed, ElapsedClock};
use crate::display::Display;
use crate::error::{Error, Result};
use crate::hw::{DigitDriver, FreeRunningCounter, Transmitter, UnitIndicator};
use crate::report::{self, Digits};
use crate::serial::{Dispatch, TxPipeline};
use crate::signal::{Sample, SampleSlot};
use crate::TICK_HZ;

/// Foreground view of the output pipeline.
pub trait ReportSink {
    fn is_busy(&mut self) -> bool;
    fn start(&mut self, report: &[u8]) -> Dispatch;
}

impl<T, const LEN: usize> ReportSink for TxPipeline<T, LEN>
where
    T: Transmitter,
{
    fn is_busy(&mut self) -> bool {
        TxPipeline::is_busy(self)
    }

    fn start(&mut self, report: &[u8]) -> Dispatch {
        TxPipeline::start(self, report)
    }
}

pub struct Coordinator<'a, D, DE, C, L>
where
    D: DigitDriver<Error = DE>,
{
    samples: &'a SampleSlot,
    clock: &'a ElapsedClock,
    counter: C,
    display: Display<D, DE>,
    indicator: L,
    dropped_reports: u32,
}

impl<'a, D, DE, C, L> Coordinator<'a, D, DE, C, L>
where
    D: DigitDriver<Error = DE>,
    C: FreeRunningCounter,
    L: UnitIndicator,
{
    pub fn new(
        samples: &'a SampleSlot,
        clock: &'a ElapsedClock,
        counter: C,
        display: Display<D, DE>,
        indicator: L,
    ) -> Self {
        Coordinator {
            samples,
            clock,
            counter,
            display,
            indicator,
            dropped_reports: 0,
        }
    }

    /// One pass of the foreground loop. Does nothing unless a sample is
    /// pending and the pipeline is idle; otherwise consumes the sample and
    /// returns it.
    pub fn poll<S: ReportSink>(&mut self, sink: &mut S) -> Result<Option<Sample>, DE> {
        if !self.samples.is_ready() || sink.is_busy() {
            return Ok(None);
        }
        let sample = match self.samples.take() {
            Some(sample) => sample,
            None => return Ok(None),
        };

        let elapsed = Elapsed::from_ticks(self.clock.ticks(&self.counter), TICK_HZ);
        let digits = Digits::from_value(sample.value);

        self.indicator.show(sample.unit);
        self.display.show(&digits, sample.unit)?;

        let report =
            report::format(&elapsed, &digits, sample.unit).map_err(|_| Error::BufferWrite)?;
        if sink.start(report.as_bytes()) == Dispatch::Busy {
            self.dropped_reports = self.dropped_reports.wrapping_add(1);
            debug!("report dropped, {=u32} so far", self.dropped_reports);
        }
        Ok(Some(sample))
    }

    pub fn dropped_reports(&self) -> u32 {
        self.dropped_reports
    }
}
