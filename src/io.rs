use serde::{Deserialize, Serialize};

use crate::display::DisplayRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    One,
    Two,
}

impl Channel {
    pub fn number(self) -> u16 {
        match self {
            Channel::One => 1,
            Channel::Two => 2,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Channel::One => 0,
            Channel::Two => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
}

impl Button {
    pub fn index(self) -> usize {
        match self {
            Button::Left => 0,
            Button::Right => 1,
            Button::Up => 2,
            Button::Down => 3,
        }
    }
}

// Samples are in millivolts.
pub trait DetectorIo {
    fn sample_channel(&mut self, channel: Channel) -> u16;
    fn read_button(&mut self, button: Button) -> bool;
    // low = channel 1, high = channel 2
    fn read_mode_selector(&mut self) -> bool;
    fn read_live_value(&mut self) -> u16;
    fn request_display(&mut self, request: DisplayRequest);
    fn set_intensity(&mut self, level: u16);
    fn await_tick(&mut self);
}
