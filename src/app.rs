use cortex_m::singleton;
use lib::coordinator::{Coordinator, ReportSink};
use lib::debounce::Debouncer;
use lib::hw::{
    init_clock, init_display, Adc, AdcConfig, Button, ButtonPin, HwDisplay, SerialTx, SpiError,
    TickCounter, TickTimer, UnitLeds,
};
use lib::sampler::Sampler;
use lib::serial::{Dispatch, TxPipeline};
use lib::{
    SampleBuffer, BAUD_RATE, CLOCK, DEBOUNCE_TICKS, REPORT_LEN, SAMPLES, SAMPLE_COUNT,
    SAMPLE_RATE_HZ, UNIT,
};
use rtic::app;
use rtic::Mutex;
use stm32g0xx_hal::delay::DelayExt;
use stm32g0xx_hal::dma::DmaExt;
use stm32g0xx_hal::dmamux::DmaMuxIndex;
use stm32g0xx_hal::exti::SignalEdge;
use stm32g0xx_hal::gpio::GpioExt;
use stm32g0xx_hal::spi::{NoMiso, SpiExt, MODE_0};
use stm32g0xx_hal::time::U32Ext;

type Pipeline = TxPipeline<SerialTx, REPORT_LEN>;
type HwCoordinator = Coordinator<'static, HwDisplay, SpiError, TickCounter, UnitLeds>;

/// Foreground access to the pipeline shared with the USART2 handler.
struct Locked<M>(M);

impl<M> ReportSink for Locked<M>
where
    M: Mutex<T = Pipeline>,
{
    fn is_busy(&mut self) -> bool {
        self.0.lock(|pipeline: &mut Pipeline| pipeline.is_busy())
    }

    fn start(&mut self, report: &[u8]) -> Dispatch {
        self.0.lock(|pipeline: &mut Pipeline| pipeline.start(report))
    }
}

#[app(device = stm32g0xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        coordinator: HwCoordinator,
        pipeline: Pipeline,
        sampler: Sampler<'static, SAMPLE_COUNT>,
        adc: Adc,
        tick_timer: TickTimer,
        button: Button,
        debouncer: Debouncer<'static>,
    }

    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        let core: rtic::export::Peripherals = cx.core;
        let device: stm32g0xx_hal::stm32::Peripherals = cx.device;

        // Buffers
        let sample_buffer: &'static mut SampleBuffer =
            singleton!(: SampleBuffer = [0; SAMPLE_COUNT]).unwrap();

        // Clock
        let mut rcc = init_clock(device.RCC);
        let mut delay = core.SYST.delay(&mut rcc);

        // GPIO
        let gpioa = device.GPIOA.split(&mut rcc);
        let gpiob = device.GPIOB.split(&mut rcc);
        let gpioc = device.GPIOC.split(&mut rcc);

        // Display
        let spi = device
            .SPI1
            .spi((gpioa.pa5, NoMiso, gpioa.pa7), MODE_0, 1.mhz(), &mut rcc);
        let display = init_display(spi, gpioa.pa4.into_push_pull_output()).unwrap();
        let leds = UnitLeds::new(
            gpiob.pb0.into_push_pull_output(),
            gpiob.pb1.into_push_pull_output(),
        );
        let coordinator = Coordinator::new(&SAMPLES, &CLOCK, TickCounter, display, leds);

        // Serial
        let serial =
            SerialTx::new(device.USART2, gpioa.pa2, gpioa.pa3, BAUD_RATE, &mut rcc).unwrap();
        let pipeline = TxPipeline::new(serial);

        // ADC
        let dma = device.DMA.split(&mut rcc, device.DMAMUX);
        let mut ch1 = dma.ch1;
        ch1.mux().select_peripheral(DmaMuxIndex::ADC);
        let adc = Adc::new(
            device.ADC,
            device.TIM1,
            sample_buffer,
            AdcConfig::new(gpioa.pa0, ch1, SAMPLE_RATE_HZ.hz()),
            &mut rcc,
            &mut delay,
        );
        let sampler = Sampler::new(&SAMPLES, &UNIT);

        // Clock and unit button
        let tick_timer = TickTimer::new(device.TIM3, &mut rcc);
        let mut exti = device.EXTI;
        let button_pin: ButtonPin = gpioc
            .pc13
            .into_floating_input()
            .listen(SignalEdge::Falling, &mut exti);
        let button = Button::new(button_pin, exti);
        let debouncer = Debouncer::new(DEBOUNCE_TICKS, &UNIT);

        defmt::info!("thermo up, {=u32} samples per block", SAMPLE_COUNT as u32);

        init::LateResources {
            coordinator,
            pipeline,
            sampler,
            adc,
            tick_timer,
            button,
            debouncer,
        }
    }

    #[idle(resources = [coordinator, pipeline, adc, tick_timer])]
    fn idle(mut cx: idle::Context) -> ! {
        cx.resources.tick_timer.lock(|timer: &mut TickTimer| {
            timer.start();
        });
        cx.resources.adc.lock(|adc: &mut Adc| {
            adc.start();
        });

        let coordinator: &mut HwCoordinator = cx.resources.coordinator;
        let mut sink = Locked(cx.resources.pipeline);
        loop {
            if coordinator.poll(&mut sink).is_err() {
                defmt::error!("display transfer failed");
            }
        }
    }

    #[task(binds = DMA_CHANNEL1, priority = 3, resources = [adc, sampler])]
    fn dma(cx: dma::Context) {
        let adc: &mut Adc = cx.resources.adc;
        let sampler: &mut Sampler<'static, SAMPLE_COUNT> = cx.resources.sampler;

        adc.unpend();
        adc.stop();
        let sample = sampler.convert(adc.buffer());
        adc.restart();
        sampler.publish(sample);
    }

    #[task(binds = TIM3, priority = 2, resources = [tick_timer, button, debouncer])]
    fn tim3(cx: tim3::Context) {
        let timer: &mut TickTimer = cx.resources.tick_timer;
        let button: &mut Button = cx.resources.button;
        let debouncer: &mut Debouncer<'static> = cx.resources.debouncer;

        if timer.overflow_pending() {
            // The sampling task reads the clock for log timestamps and must
            // never see the flag cleared before the count moved.
            cortex_m::interrupt::free(|_| {
                timer.clear_overflow();
                CLOCK.on_overflow();
            });
        }
        if timer.take_compare() {
            debouncer.on_expiry(button, timer);
        }
    }

    #[task(binds = EXTI4_15, priority = 2, resources = [tick_timer, button, debouncer])]
    fn exti(cx: exti::Context) {
        let timer: &mut TickTimer = cx.resources.tick_timer;
        let button: &mut Button = cx.resources.button;
        let debouncer: &mut Debouncer<'static> = cx.resources.debouncer;

        if button.take_edge() {
            debouncer.on_edge(button, timer);
        }
    }

    #[task(binds = USART2, priority = 1, resources = [pipeline])]
    fn usart2(cx: usart2::Context) {
        let pipeline: &mut Pipeline = cx.resources.pipeline;
        pipeline.on_complete();
    }
};
