mod adc;
mod buttons;
mod led_bar;
mod oled;

use anyhow::Result;
use log::warn;
use rppal::gpio::Gpio;
use std::sync::mpsc::{self, SyncSender};
use std::thread;
use std::time::Duration;

use metal_detector::ticker::Ticker;
use metal_detector::{Button, Channel, DetectorIo, DisplayRequest, HardwareConfig};

use adc::AdcReader;
use buttons::ButtonReader;
use led_bar::LedBar;
use oled::display_thread;

/// The Raspberry Pi board: MCP3008 for the coils and the live value knob,
/// GPIO buttons and LED bar, SSD1306 readout on its own thread.
pub struct BoardIo {
    adc: AdcReader,
    buttons: ButtonReader,
    leds: LedBar,
    tx_display: SyncSender<DisplayRequest>,
    ticker: Ticker,
    config: HardwareConfig,
    last_samples: [u16; 2],
    last_live: u16,
}

impl BoardIo {
    pub fn new(config: HardwareConfig, tick: Duration) -> Result<Self> {
        let gpio = Gpio::new()?;
        let buttons = ButtonReader::new(&gpio, &config.button_pins, config.selector_pin)?;
        let leds = LedBar::new(&gpio, &config.led_pins)?;
        let adc = AdcReader::new()?;

        let (tx_display, rx_display) = mpsc::sync_channel(1);
        let (bus, address) = (config.oled_bus, config.oled_address);
        thread::spawn(move || {
            display_thread(rx_display, bus, address);
        });

        Ok(BoardIo {
            adc,
            buttons,
            leds,
            tx_display,
            ticker: Ticker::new(tick),
            config,
            last_samples: [0, 0],
            last_live: 0,
        })
    }
}

impl DetectorIo for BoardIo {
    fn sample_channel(&mut self, channel: Channel) -> u16 {
        let i = channel.index();
        match self.adc.read_millivolts(self.config.coil_adc[i]) {
            Ok(mv) => self.last_samples[i] = mv,
            Err(e) => warn!("coil {} read failed, reusing last sample: {}", channel.number(), e),
        }
        self.last_samples[i]
    }

    fn read_button(&mut self, button: Button) -> bool {
        self.buttons.is_pressed(button)
    }

    fn read_mode_selector(&mut self) -> bool {
        self.buttons.selector()
    }

    fn read_live_value(&mut self) -> u16 {
        match self.adc.read_millivolts(self.config.live_value_adc) {
            Ok(mv) => self.last_live = mv,
            Err(e) => warn!("live value read failed: {}", e),
        }
        self.last_live
    }

    fn request_display(&mut self, request: DisplayRequest) {
        // Dropped while the display thread is busy; the next tick sends again.
        let _ = self.tx_display.try_send(request);
    }

    fn set_intensity(&mut self, level: u16) {
        self.leds.display_level(level);
    }

    fn await_tick(&mut self) {
        let before = self.ticker.overruns();
        self.ticker.wait();
        if self.ticker.overruns() != before {
            warn!("tick overran its period ({} so far)", self.ticker.overruns());
        }
    }
}
