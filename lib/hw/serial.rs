use stm32g0xx_hal::hal::serial::Write;
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::serial::{FullConfig, InvalidConfig, SerialExt, Tx};
use stm32g0xx_hal::stm32g0::stm32g070::USART2;
use stm32g0xx_hal::time::U32Ext;

use crate::hw::helper::{SerialPin, SerialRxPin};
use crate::hw::Transmitter;

/// USART2 transmit half, 8N1, FIFO disabled. The transmit data register
/// empty interrupt drives the report pipeline.
pub struct SerialTx {
    tx: Tx<USART2, FullConfig>,
}

impl SerialTx {
    pub fn new(
        usart: USART2,
        tx_pin: SerialPin,
        rx_pin: SerialRxPin,
        baud_rate: u32,
        rcc: &mut Rcc,
    ) -> Result<Self, InvalidConfig> {
        let config = FullConfig::default().baudrate(baud_rate.bps());
        // Nothing is ever received
        let (tx, _rx) = usart.usart(tx_pin, rx_pin, config, rcc)?.split();
        Ok(SerialTx { tx })
    }
}

impl Transmitter for SerialTx {
    fn write(&mut self, byte: u8) {
        // Only called with the data register empty
        self.tx.write(byte).ok();
    }

    fn listen(&mut self) {
        self.tx.listen();
    }

    fn unlisten(&mut self) {
        self.tx.unlisten();
    }
}
