use log::info;

use crate::display::DisplayRequest;
use crate::io::{Button, Channel, DetectorIo};
use crate::ticker::Ticker;

/// One stretch of the simulated scene: how far each coil reading sits
/// below its resting level, in millivolts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub ticks: u64,
    pub drop: [u16; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub button: Button,
    pub at: u64,
    pub ticks: u64,
}

/// Host stand-in for the board: coils at rest with a little ripple, and
/// objects sweeping past on a loop.
pub struct SimulatedIo {
    rest: [u16; 2],
    scene: Vec<Segment>,
    presses: Vec<Press>,
    pub selector: bool,
    pub live_value: u16,
    tick: u64,
    reads: u64,
    ticker: Option<Ticker>,
    record: bool,
    pub displays: Vec<DisplayRequest>,
    pub intensities: Vec<u16>,
    last_display: Option<DisplayRequest>,
}

impl SimulatedIo {
    pub fn new(rest: [u16; 2], scene: Vec<Segment>) -> Self {
        SimulatedIo {
            rest,
            scene,
            presses: Vec::new(),
            selector: false,
            live_value: 0,
            tick: 0,
            reads: 0,
            ticker: None,
            record: false,
            displays: Vec::new(),
            intensities: Vec::new(),
            last_display: None,
        }
    }

    pub fn demo() -> Self {
        let idle = Segment {
            ticks: 100,
            drop: [0, 0],
        };
        let scene = vec![
            idle,
            Segment { ticks: 60, drop: [80, 0] },
            Segment { ticks: 60, drop: [160, 0] },
            Segment { ticks: 60, drop: [90, 90] },
            Segment { ticks: 60, drop: [0, 160] },
            Segment { ticks: 60, drop: [0, 80] },
            idle,
        ];
        SimulatedIo::new([1000, 1020], scene)
    }

    pub fn realtime(mut self, ticker: Ticker) -> Self {
        self.ticker = Some(ticker);
        self
    }

    pub fn recording(mut self) -> Self {
        self.record = true;
        self
    }

    pub fn press(&mut self, button: Button, at: u64, ticks: u64) {
        self.presses.push(Press { button, at, ticks });
    }

    fn drop_now(&self, channel: Channel) -> u16 {
        let total: u64 = self.scene.iter().map(|s| s.ticks).sum();
        if total == 0 {
            return 0;
        }
        let mut t = self.tick % total;
        for segment in &self.scene {
            if t < segment.ticks {
                return segment.drop[channel.index()];
            }
            t -= segment.ticks;
        }
        0
    }

    // Deterministic ripple of -5..=5 mV, well inside the dead zone.
    fn ripple(&mut self) -> i32 {
        self.reads = self.reads.wrapping_add(1);
        (self.reads.wrapping_mul(7) % 11) as i32 - 5
    }
}

impl DetectorIo for SimulatedIo {
    fn sample_channel(&mut self, channel: Channel) -> u16 {
        let level = self.rest[channel.index()] as i32 - self.drop_now(channel) as i32 + self.ripple();
        level.clamp(0, u16::MAX as i32) as u16
    }

    fn read_button(&mut self, button: Button) -> bool {
        self.presses
            .iter()
            .any(|p| p.button == button && self.tick >= p.at && self.tick < p.at + p.ticks)
    }

    fn read_mode_selector(&mut self) -> bool {
        self.selector
    }

    fn read_live_value(&mut self) -> u16 {
        self.live_value
    }

    fn request_display(&mut self, request: DisplayRequest) {
        if self.last_display != Some(request) {
            info!("display: {}", request.text());
        }
        self.last_display = Some(request);
        if self.record {
            self.displays.push(request);
        }
    }

    fn set_intensity(&mut self, level: u16) {
        if self.record {
            self.intensities.push(level);
        }
    }

    fn await_tick(&mut self) {
        if let Some(ticker) = &mut self.ticker {
            ticker.wait();
        }
        self.tick += 1;
    }
}
