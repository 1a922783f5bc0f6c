use anyhow::{Result, bail};
use log::info;
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

const VREF_MV: u32 = 3300;
const FULL_SCALE: u32 = 1024;

/// MCP3008 on SPI0.0, single-ended reads.
pub struct AdcReader {
    spi: Spi,
}

impl AdcReader {
    pub fn new() -> Result<Self> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, 1_000_000, Mode::Mode0)?;
        info!("MCP3008 ADC initialized on SPI0.0");
        Ok(AdcReader { spi })
    }

    pub fn read_raw(&mut self, channel: u8) -> Result<u16> {
        if channel >= 8 {
            bail!("ADC channel must be 0-7, got {}", channel);
        }

        let tx_buffer = [0x01, (0x08 | channel) << 4, 0x00];
        let mut rx_buffer = [0u8; 3];

        self.spi.transfer(&mut rx_buffer, &tx_buffer)?;

        Ok(decode(rx_buffer))
    }

    pub fn read_millivolts(&mut self, channel: u8) -> Result<u16> {
        Ok(to_millivolts(self.read_raw(channel)?))
    }
}

fn decode(rx: [u8; 3]) -> u16 {
    (((rx[1] & 0x03) as u16) << 8) | (rx[2] as u16)
}

pub fn to_millivolts(raw: u16) -> u16 {
    ((raw as u32 * VREF_MV) / FULL_SCALE) as u16
}
