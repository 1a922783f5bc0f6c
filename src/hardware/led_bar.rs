use anyhow::Result;
use log::info;
use rppal::gpio::{Gpio, OutputPin};

/// LED strength meter. The controller hands over a 16-bit bar filled from
/// the top bit; boards with fewer LEDs show it scaled.
pub struct LedBar {
    pins: Vec<OutputPin>,
    shown: Option<usize>,
}

impl LedBar {
    pub fn new(gpio: &Gpio, pin_numbers: &[u8]) -> Result<Self> {
        let mut pins = Vec::new();

        for &pin_num in pin_numbers {
            let mut pin = gpio.get(pin_num)?.into_output();
            pin.set_low();
            info!("GPIO Led {} initialized", pin_num);
            pins.push(pin);
        }

        Ok(LedBar { pins, shown: None })
    }

    pub fn display_level(&mut self, level: u16) {
        let lit = lit_count(level, self.pins.len());
        if self.shown == Some(lit) {
            return;
        }

        for (n, pin) in self.pins.iter_mut().enumerate() {
            if n < lit {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
        self.shown = Some(lit);
    }
}

fn lit_count(level: u16, leds: usize) -> usize {
    level.leading_ones() as usize * leds / 16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_sixteen_to_eight() {
        assert_eq!(lit_count(0, 8), 0);
        assert_eq!(lit_count(0x8000, 8), 0);
        assert_eq!(lit_count(0xC000, 8), 1);
        assert_eq!(lit_count(0xFF00, 8), 4);
        assert_eq!(lit_count(0xFFFF, 8), 8);
        assert_eq!(lit_count(0xE000, 16), 3);
    }
}
