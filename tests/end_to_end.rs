//! Whole acquisition path on the host: a completed conversion block goes
//! through the sampling handler, the foreground loop, the display and the
//! serial pipeline, with a debounced unit toggle in between.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lib::clock::ElapsedClock;
use lib::coordinator::Coordinator;
use lib::debounce::Debouncer;
use lib::display::Display;
use lib::hw::{
    CompareTimer, DigitDriver, EdgeInput, FreeRunningCounter, Transmitter, UnitIndicator,
};
use lib::sampler::Sampler;
use lib::serial::TxPipeline;
use lib::signal::{SampleSlot, Unit, UnitSelector};
use lib::{SampleBuffer, DEBOUNCE_TICKS, REPORT_LEN, SAMPLE_COUNT, TICK_HZ};

#[derive(Clone, Default)]
struct Bus(Rc<RefCell<Vec<(u8, u8)>>>);

impl DigitDriver for Bus {
    type Error = ();

    fn write(&mut self, register: u8, data: u8) -> Result<(), ()> {
        self.0.borrow_mut().push((register, data));
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Leds(Rc<Cell<Option<Unit>>>);

impl UnitIndicator for Leds {
    fn show(&mut self, unit: Unit) {
        self.0.set(Some(unit));
    }
}

/// TIM3 stand-in: counter, overflow source and debounce compare.
#[derive(Clone, Default)]
struct Timer {
    count: Rc<Cell<u16>>,
    armed: Rc<Cell<Option<u16>>>,
}

impl Timer {
    /// Advances by `ticks`, running the overflow handler on each wrap.
    /// Returns true if the armed compare matched along the way.
    fn advance(&self, clock: &ElapsedClock, ticks: u32) -> bool {
        let mut fired = false;
        for _ in 0..ticks {
            let next = self.count.get().wrapping_add(1);
            self.count.set(next);
            if next == 0 {
                clock.on_overflow();
            }
            if self.armed.get() == Some(next) {
                fired = true;
            }
        }
        fired
    }
}

impl FreeRunningCounter for Timer {
    fn count(&self) -> u16 {
        self.count.get()
    }
}

impl CompareTimer for Timer {
    fn now(&self) -> u16 {
        self.count.get()
    }

    fn arm(&mut self, deadline: u16) {
        self.armed.set(Some(deadline));
    }

    fn disarm(&mut self) {
        self.armed.set(None);
    }
}

#[derive(Clone, Default)]
struct Uart {
    sent: Rc<RefCell<Vec<u8>>>,
    listening: Rc<Cell<bool>>,
}

impl Uart {
    fn take(&self) -> String {
        String::from_utf8(self.sent.borrow_mut().drain(..).collect()).unwrap()
    }
}

impl Transmitter for Uart {
    fn write(&mut self, byte: u8) {
        self.sent.borrow_mut().push(byte);
    }

    fn listen(&mut self) {
        self.listening.set(true);
    }

    fn unlisten(&mut self) {
        self.listening.set(false);
    }
}

struct ButtonLine {
    pressed: bool,
    edge_enabled: bool,
}

impl EdgeInput for ButtonLine {
    fn disable_edge(&mut self) {
        self.edge_enabled = false;
    }

    fn enable_edge(&mut self) {
        self.edge_enabled = true;
    }

    fn is_asserted(&self) -> bool {
        self.pressed
    }
}

fn block(raw: u16) -> SampleBuffer {
    [raw; SAMPLE_COUNT]
}

/// Runs transmit-complete interrupts until the pipeline goes idle.
fn drain(pipeline: &mut TxPipeline<Uart, REPORT_LEN>, uart: &Uart) -> usize {
    let mut interrupts = 0;
    while uart.listening.get() {
        pipeline.on_complete();
        interrupts += 1;
    }
    interrupts
}

#[test]
fn sample_to_display_and_serial() {
    let clock = ElapsedClock::new();
    let samples = SampleSlot::new();
    let unit = UnitSelector::new(Unit::Celsius);

    let bus = Bus::default();
    let leds = Leds::default();
    let timer = Timer::default();
    let uart = Uart::default();

    let mut sampler = Sampler::<SAMPLE_COUNT>::new(&samples, &unit);
    let mut debouncer = Debouncer::new(DEBOUNCE_TICKS, &unit);
    let mut pipeline = TxPipeline::<_, REPORT_LEN>::new(uart.clone());
    let display = Display::new(bus.clone()).unwrap();
    let mut coordinator = Coordinator::new(&samples, &clock, timer.clone(), display, leds.clone());
    let mut button = ButtonLine {
        pressed: false,
        edge_enabled: true,
    };
    let mut compare = timer.clone();
    bus.0.borrow_mut().clear();

    // Nothing pending yet
    assert_eq!(coordinator.poll(&mut pipeline).unwrap(), None);

    // First block completes one second in
    timer.advance(&clock, TICK_HZ);
    sampler.publish(sampler.convert(&block(232)));
    let sample = coordinator.poll(&mut pipeline).unwrap().unwrap();
    assert_eq!(sample.value, 2483);
    assert_eq!(sample.unit, Unit::Celsius);

    let writes: Vec<(u8, u8)> = vec![(0x01, 0x4E), (0x06, 2), (0x05, 0x84), (0x04, 8), (0x03, 3)];
    assert_eq!(*bus.0.borrow(), writes);
    assert_eq!(leds.0.get(), Some(Unit::Celsius));

    // The foreground returns immediately; bytes go out one per interrupt
    assert!(pipeline.is_busy());
    let line = "[00:00:01] Temp = 24.83 C\r\n";
    assert_eq!(drain(&mut pipeline, &uart), line.len());
    assert_eq!(uart.take(), line);
    assert!(!pipeline.is_busy());

    // Button press with bounce, confirmed after the settle window
    button.pressed = true;
    debouncer.on_edge(&mut button, &mut compare);
    assert!(!button.edge_enabled);
    assert!(timer.advance(&clock, u32::from(DEBOUNCE_TICKS)));
    assert_eq!(
        debouncer.on_expiry(&mut button, &mut compare),
        Some(Unit::Fahrenheit)
    );
    assert!(button.edge_enabled);
    button.pressed = false;

    // Next block reports in the other unit
    timer.advance(&clock, TICK_HZ - u32::from(DEBOUNCE_TICKS));
    bus.0.borrow_mut().clear();
    // 27.41 °C, 2741 * 9 / 5 = 4933.8
    sampler.publish(sampler.convert(&block(240)));
    let sample = coordinator.poll(&mut pipeline).unwrap().unwrap();
    assert_eq!(sample.value, 8133);
    assert_eq!(sample.unit, Unit::Fahrenheit);
    assert_eq!(leds.0.get(), Some(Unit::Fahrenheit));

    let writes: Vec<(u8, u8)> = vec![(0x01, 0x47), (0x06, 8), (0x05, 0x81), (0x04, 3), (0x03, 3)];
    assert_eq!(*bus.0.borrow(), writes);

    drain(&mut pipeline, &uart);
    assert_eq!(uart.take(), "[00:00:02] Temp = 81.33 F\r\n");
}

#[test]
fn late_foreground_sees_only_the_newest_sample() {
    let clock = ElapsedClock::new();
    let samples = SampleSlot::new();
    let unit = UnitSelector::new(Unit::Celsius);
    let uart = Uart::default();

    let mut sampler = Sampler::<SAMPLE_COUNT>::new(&samples, &unit);
    let mut pipeline = TxPipeline::<_, REPORT_LEN>::new(uart.clone());
    let display = Display::new(Bus::default()).unwrap();
    let mut coordinator =
        Coordinator::new(&samples, &clock, Timer::default(), display, Leds::default());

    sampler.publish(sampler.convert(&block(232)));
    sampler.publish(sampler.convert(&block(155)));
    assert_eq!(sampler.dropped(), 1);

    let sample = coordinator.poll(&mut pipeline).unwrap().unwrap();
    assert_eq!(sample.value, 0);
    assert_eq!(coordinator.poll(&mut pipeline).unwrap(), None);

    drain(&mut pipeline, &uart);
    assert_eq!(uart.take(), "[00:00:00] Temp = 00.00 C\r\n");
}

#[test]
fn sample_waits_for_previous_report_to_drain() {
    let clock = ElapsedClock::new();
    let samples = SampleSlot::new();
    let unit = UnitSelector::new(Unit::Celsius);
    let uart = Uart::default();

    let mut sampler = Sampler::<SAMPLE_COUNT>::new(&samples, &unit);
    let mut pipeline = TxPipeline::<_, REPORT_LEN>::new(uart.clone());
    let display = Display::new(Bus::default()).unwrap();
    let mut coordinator =
        Coordinator::new(&samples, &clock, Timer::default(), display, Leds::default());

    sampler.publish(sampler.convert(&block(232)));
    assert!(coordinator.poll(&mut pipeline).unwrap().is_some());
    pipeline.on_complete();

    sampler.publish(sampler.convert(&block(155)));
    assert_eq!(coordinator.poll(&mut pipeline).unwrap(), None);
    assert!(samples.is_ready());

    drain(&mut pipeline, &uart);
    assert_eq!(uart.take(), "[00:00:00] Temp = 24.83 C\r\n");

    assert!(coordinator.poll(&mut pipeline).unwrap().is_some());
    drain(&mut pipeline, &uart);
    assert_eq!(uart.take(), "[00:00:00] Temp = 00.00 C\r\n");
    assert_eq!(coordinator.dropped_reports(), 0);
}

#[test]
fn reading_above_four_digits_saturates() {
    let clock = ElapsedClock::new();
    let samples = SampleSlot::new();
    let unit = UnitSelector::new(Unit::Celsius);
    let bus = Bus::default();
    let uart = Uart::default();

    let mut sampler = Sampler::<SAMPLE_COUNT>::new(&samples, &unit);
    let mut pipeline = TxPipeline::<_, REPORT_LEN>::new(uart.clone());
    let display = Display::new(bus.clone()).unwrap();
    let mut coordinator =
        Coordinator::new(&samples, &clock, Timer::default(), display, Leds::default());
    bus.0.borrow_mut().clear();

    // 2.26 V reads as 175.80 °C
    sampler.publish(sampler.convert(&block(700)));
    let sample = coordinator.poll(&mut pipeline).unwrap().unwrap();
    assert_eq!(sample.value, 17_580);

    let writes: Vec<(u8, u8)> = vec![(0x01, 0x4E), (0x06, 9), (0x05, 0x89), (0x04, 9), (0x03, 9)];
    assert_eq!(*bus.0.borrow(), writes);
    drain(&mut pipeline, &uart);
    assert_eq!(uart.take(), "[00:00:00] Temp = 99.99 C\r\n");
}
