use stm32g0xx_hal::hal::PwmPin as PwmPinTrait;
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::{RCC, TIM1, TIM3};
use stm32g0xx_hal::time::Hertz;
use stm32g0xx_hal::timer::pins::TimerPin;
use stm32g0xx_hal::timer::pwm::{Pwm, PwmExt, PwmPin};
use stm32g0xx_hal::timer::Channel4;

use crate::hw::{clear_mask, CompareTimer, FreeRunningCounter};
use crate::TICK_HZ;

// TIMx_SR flags, cleared by writing zero
const UIF: u32 = 1 << 0;
const CC1IF: u32 = 1 << 1;

struct UnusedPin;

impl TimerPin<TIM1> for UnusedPin {
    type Channel = Channel4;

    fn setup(&self) {
        // Do nothing
    }

    fn release(self) -> Self {
        self
    }
}

/// Conversion trigger, a 50 % PWM on TIM1_CC4 routed to the ADC.
pub struct SampleTimer {
    _timer: Pwm<TIM1>,
    trig: PwmPin<TIM1, Channel4>,
}

impl SampleTimer {
    pub fn new(pac_timer: TIM1, freq: Hertz, rcc: &mut Rcc) -> Self {
        let timer = pac_timer.pwm(freq, rcc);
        let trig = timer.bind_pin(UnusedPin);
        SampleTimer {
            _timer: timer,
            trig,
        }
    }

    pub fn start(&mut self) {
        self.trig.set_duty(self.trig.get_max_duty() / 2);
        self.trig.enable();
    }
}

/// TIM3 counting at `TICK_HZ` over the full 16-bit range. The update
/// interrupt feeds the elapsed clock, compare channel 1 is the debounce
/// one-shot.
pub struct TickTimer {
    timer: TIM3,
}

impl TickTimer {
    pub fn new(pac_timer: TIM3, rcc: &mut Rcc) -> Self {
        TickTimer::enable_clock_and_reset(rcc);
        let mut timer = TickTimer { timer: pac_timer };
        timer.configure(rcc.clocks.apb_tim_clk.0);
        timer
    }

    pub fn start(&mut self) {
        self.timer.sr.write(|w| unsafe { w.bits(0) });
        self.timer.dier.modify(|_, w| w.uie().set_bit());
        self.timer.cr1.modify(|_, w| w.cen().set_bit());
    }

    pub fn overflow_pending(&self) -> bool {
        self.timer.sr.read().uif().bit_is_set()
    }

    pub fn clear_overflow(&mut self) {
        self.clear_flags(UIF);
    }

    /// Clears and reports a pending compare match while the one-shot is
    /// armed.
    pub fn take_compare(&mut self) -> bool {
        let armed = self.timer.dier.read().cc1ie().bit_is_set();
        if !armed || self.timer.sr.read().cc1if().bit_is_clear() {
            return false;
        }
        self.clear_flags(CC1IF);
        true
    }

    fn clear_flags(&mut self, flags: u32) {
        self.timer.sr.write(|w| unsafe { w.bits(clear_mask(flags)) });
    }

    fn configure(&mut self, timer_clock: u32) {
        self.timer
            .psc
            .write(|w| unsafe { w.psc().bits((timer_clock / TICK_HZ - 1) as u16) });
        self.timer
            .arr
            .write(|w| unsafe { w.arr_l().bits(u16::max_value()) });

        // Load the prescaler without raising an update interrupt
        self.timer.cr1.modify(|_, w| w.urs().set_bit());
        self.timer.egr.write(|w| w.ug().set_bit());
        self.timer.cr1.modify(|_, w| w.urs().clear_bit());
    }

    fn enable_clock_and_reset(_: &mut Rcc) {
        let rcc = unsafe { &(*RCC::ptr()) };
        rcc.apbenr1.modify(|_, w| w.tim3en().set_bit());
        rcc.apbrstr1.modify(|_, w| w.tim3rst().set_bit());
        rcc.apbrstr1.modify(|_, w| w.tim3rst().clear_bit());
    }
}

impl CompareTimer for TickTimer {
    fn now(&self) -> u16 {
        self.timer.cnt.read().cnt_l().bits()
    }

    fn arm(&mut self, deadline: u16) {
        self.timer
            .ccr1
            .write(|w| unsafe { w.ccr1_l().bits(deadline) });
        self.clear_flags(CC1IF);
        self.timer.dier.modify(|_, w| w.cc1ie().set_bit());
    }

    fn disarm(&mut self) {
        self.timer.dier.modify(|_, w| w.cc1ie().clear_bit());
        self.clear_flags(CC1IF);
    }
}

/// Read-only view of the TIM3 counter for contexts that do not own the
/// timer.
pub struct TickCounter;

impl FreeRunningCounter for TickCounter {
    fn count(&self) -> u16 {
        // Counter register reads have no side effects
        unsafe { (*TIM3::ptr()).cnt.read().cnt_l().bits() }
    }

    fn overflow_pending(&self) -> bool {
        unsafe { (*TIM3::ptr()).sr.read().uif().bit_is_set() }
    }
}
