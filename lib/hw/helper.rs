use stm32g0xx_hal::gpio::gpioa::{PA0, PA2, PA3, PA4, PA5, PA7};
use stm32g0xx_hal::gpio::gpiob::{PB0, PB1};
use stm32g0xx_hal::gpio::gpioc::PC13;
use stm32g0xx_hal::gpio::{Analog, DefaultMode, Floating, Input, Output, PushPull};
use stm32g0xx_hal::dma::C1;
use stm32g0xx_hal::rcc::{Config, PllConfig, Rcc, RccExt};
use stm32g0xx_hal::spi::{NoMiso, Spi};
use stm32g0xx_hal::stm32g0::stm32g070::{RCC, SPI1};

use crate::display::Display;
use crate::error::Result;
use crate::hw::adc::Adc as HwAdc;
use crate::hw::max7219::{Max7219, SpiError};

pub fn init_clock(pac_rcc: RCC) -> Rcc {
    // ((16 MHz / 4) * 32) / 2 = 64 MHz
    let pll_config = PllConfig::with_hsi(4, 32, 2);
    pac_rcc.freeze(Config::pll().pll_cfg(pll_config))
}

// PA0 - ADC temperature sensor input
type SensorInput = PA0<Analog>;
// PA2 - USART2_TX (report output)
pub type SerialPin = PA2<DefaultMode>;
// PA3 - USART2_RX (unused, claimed by the USART)
pub type SerialRxPin = PA3<DefaultMode>;
// PA4 - MAX7219 LOAD/CS
pub type DisplayCs = PA4<Output<PushPull>>;
// PA5 - SPI1_SCK
pub type DisplaySck = PA5<DefaultMode>;
// PA7 - SPI1_MOSI
pub type DisplayMosi = PA7<DefaultMode>;
// PB0 - Celsius indicator LED
pub type CelsiusLed = PB0<Output<PushPull>>;
// PB1 - Fahrenheit indicator LED
pub type FahrenheitLed = PB1<Output<PushPull>>;
// PC13 - Unit button (active low, EXTI13)
pub type ButtonPin = PC13<Input<Floating>>;
// ADC DMA channel
type DmaChannel = C1;

pub type Adc = HwAdc<SensorInput, DmaChannel>;
pub type DisplaySpi = Spi<SPI1, (DisplaySck, NoMiso, DisplayMosi)>;
pub type HwDisplay = Max7219<DisplaySpi, DisplayCs>;

/// Wraps the SPI bus in the display driver and runs the MAX7219 start-up
/// sequence.
pub fn init_display(spi: DisplaySpi, cs: DisplayCs) -> Result<Display<HwDisplay, SpiError>, SpiError> {
    Display::new(Max7219::new(spi, cs))
}
