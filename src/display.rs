use std::collections::VecDeque;

use serde::Serialize;

use crate::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Message {
    NotDetected,
    Center,
    FarLeft,
    Left,
    Right,
    FarRight,
    Calibrate,
    Adc1,
    Adc2,
    Set,
    Adc,
    Threshold,
    Close,
}

impl Message {
    pub fn label(self) -> &'static str {
        match self {
            Message::NotDetected => "n.dEt",
            Message::Center => "Cntr",
            Message::FarLeft => "F.LFt",
            Message::Left => "LEFt",
            Message::Right => "rght",
            Message::FarRight => "F.rgt",
            Message::Calibrate => "CAL.",
            Message::Adc1 => "Adc1",
            Message::Adc2 => "Adc2",
            Message::Set => "SEt",
            Message::Adc => "Adc",
            Message::Threshold => "trSh.",
            Message::Close => "CLSE.",
        }
    }

    pub fn for_zone(zone: Option<Zone>) -> Message {
        match zone {
            None => Message::NotDetected,
            Some(Zone::FarLeft) => Message::FarLeft,
            Some(Zone::Left) => Message::Left,
            Some(Zone::Center) => Message::Center,
            Some(Zone::Right) => Message::Right,
            Some(Zone::FarRight) => Message::FarRight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayRequest {
    Canned(Message),
    // four hex digits, bit 3 of decimal_points is the leftmost one
    Numeric { value: u16, decimal_points: u8 },
}

impl DisplayRequest {
    pub fn number(value: u16) -> Self {
        DisplayRequest::Numeric {
            value,
            decimal_points: 0,
        }
    }

    pub fn text(&self) -> String {
        match *self {
            DisplayRequest::Canned(message) => message.label().to_string(),
            DisplayRequest::Numeric {
                value,
                decimal_points,
            } => {
                let digits = format!("{:04X}", value);
                let mut text = String::with_capacity(8);
                for (i, c) in digits.chars().enumerate() {
                    text.push(c);
                    if decimal_points & (0b1000 >> i) != 0 {
                        text.push('.');
                    }
                }
                text
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Announcer {
    steps: VecDeque<(DisplayRequest, u16)>,
}

impl Announcer {
    pub fn new() -> Self {
        Announcer {
            steps: VecDeque::new(),
        }
    }

    pub fn push(&mut self, request: DisplayRequest, ticks: u16) {
        if ticks > 0 {
            self.steps.push_back((request, ticks));
        }
    }

    pub fn is_done(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn tick(&mut self) -> Option<DisplayRequest> {
        let (request, remaining) = self.steps.front_mut()?;
        let request = *request;
        *remaining -= 1;
        if *remaining == 0 {
            self.steps.pop_front();
        }
        Some(request)
    }
}
