use anyhow::Result;
use log::info;
use rppal::gpio::{Gpio, InputPin, Level};

use metal_detector::Button;

/// Raw button and switch levels. Debouncing happens in the controller,
/// so reads here are unfiltered.
pub struct ButtonReader {
    pins: Vec<InputPin>,
    selector: InputPin,
}

impl ButtonReader {
    /// `pin_numbers` is ordered left, right, up, down.
    pub fn new(gpio: &Gpio, pin_numbers: &[u8; 4], selector_pin: u8) -> Result<Self> {
        let mut pins = Vec::new();

        for &pin_num in pin_numbers {
            let pin = gpio.get(pin_num)?.into_input_pulldown();
            info!("GPIO {} initialized as button", pin_num);
            pins.push(pin);
        }

        let selector = gpio.get(selector_pin)?.into_input_pulldown();
        info!("GPIO {} initialized as channel selector", selector_pin);

        Ok(ButtonReader { pins, selector })
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pins[button.index()].read() == Level::High
    }

    pub fn selector(&self) -> bool {
        self.selector.read() == Level::High
    }
}
