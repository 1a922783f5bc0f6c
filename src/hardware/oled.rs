use anyhow::Result;
use log::{error, info};
use rppal::i2c::I2c;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use metal_detector::DisplayRequest;

const WIDTH: u8 = 128;
const HEIGHT: u8 = 64;
const SCALE: u8 = 3;

pub struct DisplayBuffer {
    buffer: [u8; 1024],
}

impl DisplayBuffer {
    fn new() -> Self {
        DisplayBuffer {
            buffer: [0u8; 1024],
        }
    }

    fn clear(&mut self) {
        self.buffer.fill(0);
    }

    fn set_pixel(&mut self, x: u8, y: u8) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let byte_index = (y / 8) as usize * WIDTH as usize + x as usize;
        self.buffer[byte_index] |= 1 << (y % 8);
    }

    fn draw_char(&mut self, x: u8, y: u8, c: char, scale: u8) {
        let font = glyph(c);
        for dx in 0..5u8 {
            let column = font[dx as usize];
            for dy in 0..8u8 {
                if (column >> dy) & 1 == 0 {
                    continue;
                }
                for sx in 0..scale {
                    for sy in 0..scale {
                        self.set_pixel(
                            x.saturating_add(dx * scale + sx),
                            y.saturating_add(dy * scale + sy),
                        );
                    }
                }
            }
        }
    }

    /// Draws a display request the way the four-digit readout would show
    /// it: decimal points hang off the preceding character.
    fn draw_readout(&mut self, text: &str) {
        let advance = 6 * SCALE;
        let mut x = 4u8;
        let y = (HEIGHT - 8 * SCALE) / 2;
        for c in text.to_uppercase().chars() {
            if c == '.' {
                let dot_x = x.saturating_sub(SCALE + 1);
                for sx in 0..SCALE {
                    for sy in 0..SCALE {
                        self.set_pixel(dot_x + sx, y + 8 * SCALE + 1 + sy);
                    }
                }
                continue;
            }
            self.draw_char(x, y, c, SCALE);
            x = x.saturating_add(advance);
        }
    }
}

pub struct SSD1306 {
    i2c: I2c,
}

impl SSD1306 {
    fn new(bus: u8, address: u16) -> Result<Self> {
        let mut i2c = I2c::with_bus(bus)?;
        i2c.set_slave_address(address)?;

        let mut display = SSD1306 { i2c };
        display.init()?;

        info!("SSD1306 OLED initialized on I2C bus {}, address {:#04x}", bus, address);
        Ok(display)
    }

    fn init(&mut self) -> Result<()> {
        let init_commands = [
            0xAE, 0xD5, 0x80, 0xA8, 0x3F, 0xD3, 0x00, 0x40,
            0x8D, 0x14, 0x20, 0x00, 0xA1, 0xC8, 0xDA, 0x12,
            0x81, 0xCF, 0xD9, 0xF1, 0xDB, 0x40, 0xA4, 0xA6, 0xAF,
        ];

        for &cmd in &init_commands {
            self.send_command(cmd)?;
        }

        Ok(())
    }

    fn send_command(&mut self, cmd: u8) -> Result<()> {
        self.i2c.write(&[0x00, cmd])?;
        Ok(())
    }

    fn flush(&mut self, buffer: &DisplayBuffer) -> Result<()> {
        for cmd in [0x21, 0, WIDTH - 1, 0x22, 0, HEIGHT / 8 - 1] {
            self.send_command(cmd)?;
        }

        for chunk in buffer.buffer.chunks(16) {
            let mut data = vec![0x40];
            data.extend_from_slice(chunk);
            self.i2c.write(&data)?;
        }

        Ok(())
    }
}

// 5x8 columns, only the characters the readout can produce.
fn glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0x3E, 0x51, 0x49, 0x45, 0x3E],
        '1' => [0x00, 0x42, 0x7F, 0x40, 0x00],
        '2' => [0x62, 0x51, 0x49, 0x49, 0x46],
        '3' => [0x22, 0x41, 0x49, 0x49, 0x36],
        '4' => [0x18, 0x14, 0x12, 0x7F, 0x10],
        '5' => [0x27, 0x45, 0x45, 0x45, 0x39],
        '6' => [0x3C, 0x4A, 0x49, 0x49, 0x30],
        '7' => [0x01, 0x71, 0x09, 0x05, 0x03],
        '8' => [0x36, 0x49, 0x49, 0x49, 0x36],
        '9' => [0x06, 0x49, 0x49, 0x29, 0x1E],
        'A' => [0x7C, 0x12, 0x11, 0x12, 0x7C],
        'B' => [0x7F, 0x49, 0x49, 0x49, 0x36],
        'C' => [0x3E, 0x41, 0x41, 0x41, 0x22],
        'D' => [0x7F, 0x41, 0x41, 0x41, 0x3E],
        'E' => [0x7F, 0x49, 0x49, 0x49, 0x41],
        'F' => [0x7F, 0x09, 0x09, 0x09, 0x01],
        'G' => [0x3E, 0x41, 0x49, 0x49, 0x3A],
        'H' => [0x7F, 0x08, 0x08, 0x08, 0x7F],
        'L' => [0x7F, 0x40, 0x40, 0x40, 0x40],
        'N' => [0x7F, 0x02, 0x04, 0x08, 0x7F],
        'R' => [0x7F, 0x09, 0x19, 0x29, 0x46],
        'S' => [0x26, 0x49, 0x49, 0x49, 0x32],
        'T' => [0x01, 0x01, 0x7F, 0x01, 0x01],
        _ => [0x00, 0x00, 0x00, 0x00, 0x00],
    }
}

/// Owns the OLED; redraws only when the requested content changes.
pub fn display_thread(rx: Receiver<DisplayRequest>, bus: u8, address: u16) {
    let mut display = match SSD1306::new(bus, address) {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to initialize display: {}", e);
            return;
        }
    };

    let mut buffer = DisplayBuffer::new();
    let mut shown: Option<DisplayRequest> = None;

    loop {
        let request = match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(request) => request,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if shown == Some(request) {
            continue;
        }

        buffer.clear();
        buffer.draw_readout(&request.text());
        if let Err(e) = display.flush(&buffer) {
            error!("Display error: {}", e);
            thread::sleep(Duration::from_millis(200));
            continue;
        }
        shown = Some(request);
    }
}
