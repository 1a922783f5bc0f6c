use std::mem;

use log::info;
use serde::Serialize;

use crate::calibration::{self, Baselines};
use crate::config::DetectorConfig;
use crate::configurator::{Configurator, Step, ThresholdKind};
use crate::debounce::Debouncer;
use crate::display::{Announcer, DisplayRequest, Message};
use crate::hysteresis::ChannelState;
use crate::io::{Button, Channel, DetectorIo};
use crate::led;
use crate::tracker::{ObjectCountTracker, ZoneCounters};
use crate::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    Position,
    Strength,
    ObjectCount,
}

impl Mode {
    pub fn left(self) -> Mode {
        match self {
            Mode::Position => Mode::Position,
            Mode::Strength => Mode::Position,
            Mode::ObjectCount => Mode::Strength,
        }
    }

    pub fn right(self) -> Mode {
        match self {
            Mode::Position => Mode::Strength,
            Mode::Strength => Mode::ObjectCount,
            Mode::ObjectCount => Mode::Position,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CalibrationStage {
    Announce(Announcer),
    Sampling,
    Report(Announcer),
}

// Only Running samples the coils; the other phases poll just their confirm button.
#[derive(Debug, Clone)]
pub enum Phase {
    Calibrating(CalibrationStage),
    Running,
    ConfiguringDetect(Configurator),
    ConfiguringClose(Configurator),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Calibrating(_) => "calibrating",
            Phase::Running => "running",
            Phase::ConfiguringDetect(_) => "configuring-detect",
            Phase::ConfiguringClose(_) => "configuring-close",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: &'static str,
    pub mode: Mode,
    pub channels: [ChannelState; 2],
    pub zone: Option<Zone>,
    pub counters: ZoneCounters,
    pub samples: [u16; 2],
    pub ticks: u64,
}

pub struct Controller {
    config: DetectorConfig,
    phase: Phase,
    mode: Mode,
    channels: [ChannelState; 2],
    buttons: [Debouncer; 4],
    tracker: ObjectCountTracker,
    baselines: Option<Baselines>,
    baseline_total: u16,
    led_unit: u16,
    samples: [u16; 2],
    ticks: u64,
}

impl Controller {
    pub fn new(config: DetectorConfig) -> Self {
        let mut announcer = Announcer::new();
        announcer.push(DisplayRequest::Canned(Message::Calibrate), config.announce_ticks);
        let stage = if announcer.is_done() {
            CalibrationStage::Sampling
        } else {
            CalibrationStage::Announce(announcer)
        };

        let channel = ChannelState::new(config.detect_threshold, config.close_threshold);
        let stability = config.press_stability;

        Controller {
            phase: Phase::Calibrating(stage),
            mode: Mode::Position,
            channels: [channel.clone(), channel],
            buttons: [
                Debouncer::new(stability),
                Debouncer::new(stability),
                Debouncer::new(stability),
                Debouncer::new(stability),
            ],
            tracker: ObjectCountTracker::new(config.settle_ticks, config.display_phase_ticks),
            baselines: None,
            baseline_total: 0,
            led_unit: 1,
            samples: [0, 0],
            ticks: 0,
            config,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn channel(&self, channel: Channel) -> &ChannelState {
        &self.channels[channel.index()]
    }

    pub fn baselines(&self) -> Option<Baselines> {
        self.baselines
    }

    pub fn counters(&self) -> ZoneCounters {
        self.tracker.counters()
    }

    pub fn is_close(&self) -> bool {
        self.channels[0].is_close || self.channels[1].is_close
    }

    pub fn zone(&self) -> Option<Zone> {
        Zone::classify(self.channels[0].digital, self.channels[1].digital, self.is_close())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase.name(),
            mode: self.mode,
            channels: self.channels.clone(),
            zone: self.zone(),
            counters: self.counters(),
            samples: self.samples,
            ticks: self.ticks,
        }
    }

    pub fn run<I: DetectorIo>(&mut self, io: &mut I, max_ticks: Option<u64>) {
        while max_ticks.is_none_or(|max| self.ticks < max) {
            self.tick(io);
            io.await_tick();
        }
    }

    // One display request per call, whatever the phase.
    pub fn tick<I: DetectorIo>(&mut self, io: &mut I) {
        self.ticks += 1;
        let phase = mem::replace(&mut self.phase, Phase::Running);
        self.phase = match phase {
            Phase::Calibrating(stage) => self.calibrating(io, stage),
            Phase::Running => self.running(io),
            Phase::ConfiguringDetect(cfg) => self.configuring(io, cfg, Button::Up),
            Phase::ConfiguringClose(cfg) => self.configuring(io, cfg, Button::Down),
        };
    }

    fn poll<I: DetectorIo>(&mut self, io: &mut I, button: Button) -> bool {
        let raw = io.read_button(button);
        self.buttons[button.index()].poll(raw)
    }

    fn calibrating<I: DetectorIo>(&mut self, io: &mut I, stage: CalibrationStage) -> Phase {
        match stage {
            CalibrationStage::Announce(mut announcer) => {
                if let Some(request) = announcer.tick() {
                    io.request_display(request);
                }
                if announcer.is_done() {
                    Phase::Calibrating(CalibrationStage::Sampling)
                } else {
                    Phase::Calibrating(CalibrationStage::Announce(announcer))
                }
            }
            CalibrationStage::Sampling => {
                let baselines = calibration::calibrate(self.config.calibration_samples, |ch| {
                    io.sample_channel(ch)
                });
                self.apply_baselines(baselines);

                let ticks = self.config.announce_ticks;
                let mut report = Announcer::new();
                report.push(DisplayRequest::Canned(Message::Adc1), ticks);
                report.push(DisplayRequest::number(baselines.channel1), ticks);
                report.push(DisplayRequest::Canned(Message::Adc2), ticks);
                report.push(DisplayRequest::number(baselines.channel2), ticks);
                self.report(io, report)
            }
            CalibrationStage::Report(report) => self.report(io, report),
        }
    }

    fn report<I: DetectorIo>(&mut self, io: &mut I, mut report: Announcer) -> Phase {
        match report.tick() {
            Some(request) => {
                io.request_display(request);
                if report.is_done() {
                    info!("calibration done, running");
                    Phase::Running
                } else {
                    Phase::Calibrating(CalibrationStage::Report(report))
                }
            }
            None => {
                info!("calibration done, running");
                self.running(io)
            }
        }
    }

    fn apply_baselines(&mut self, baselines: Baselines) {
        self.channels[0].baseline = baselines.channel1;
        self.channels[1].baseline = baselines.channel2;
        self.baseline_total = baselines.total();
        self.led_unit = led::led_unit(self.baseline_total);
        self.baselines = Some(baselines);
        info!(
            "baselines: channel 1 = {} mV, channel 2 = {} mV, LED unit {} mV",
            baselines.channel1, baselines.channel2, self.led_unit
        );
    }

    fn running<I: DetectorIo>(&mut self, io: &mut I) -> Phase {
        let s1 = io.sample_channel(Channel::One);
        let s2 = io.sample_channel(Channel::Two);
        self.samples = [s1, s2];

        let margin = self.config.margin();
        self.channels[0].update(s1, margin);
        self.channels[1].update(s2, margin);
        let is_close = self.is_close();

        self.tracker.tick(self.channels[0].digital, self.channels[1].digital, is_close);

        io.set_intensity(led::intensity(self.baseline_total, s1, s2, self.led_unit));
        let request = match self.mode {
            Mode::Position => DisplayRequest::Canned(Message::for_zone(self.zone())),
            Mode::Strength => DisplayRequest::number(led::strength(self.baseline_total, s1, s2)),
            Mode::ObjectCount => self.tracker.display(),
        };
        io.request_display(request);

        self.buttons_tick(io)
    }

    fn buttons_tick<I: DetectorIo>(&mut self, io: &mut I) -> Phase {
        if self.poll(io, Button::Left) {
            self.set_mode(self.mode.left());
        }
        if self.poll(io, Button::Right) {
            self.set_mode(self.mode.right());
        }
        // Down is left unpolled on the tick Up fires; it is serviced once
        // the detect session is over.
        if self.poll(io, Button::Up) {
            info!("configuring detect threshold");
            return Phase::ConfiguringDetect(Configurator::new(
                ThresholdKind::Detect,
                self.config.announce_ticks,
            ));
        }
        if self.poll(io, Button::Down) {
            info!("configuring close threshold");
            return Phase::ConfiguringClose(Configurator::new(
                ThresholdKind::Close,
                self.config.announce_ticks,
            ));
        }
        Phase::Running
    }

    fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            info!("mode {:?} => {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    fn configuring<I: DetectorIo>(&mut self, io: &mut I, mut cfg: Configurator, confirm: Button) -> Phase {
        let selector = io.read_mode_selector();
        let live = io.read_live_value();
        let debouncer = &mut self.buttons[confirm.index()];
        let step = cfg.tick(selector, live, || debouncer.poll(io.read_button(confirm)));

        match step {
            Step::Show(request) => io.request_display(request),
            Step::Latched {
                channel,
                value,
                display,
            } => {
                let state = &mut self.channels[channel.index()];
                match cfg.kind() {
                    ThresholdKind::Detect => state.detect_threshold = value,
                    ThresholdKind::Close => state.close_threshold = value,
                }
                io.request_display(display);
            }
            Step::Finished => {
                info!("{:?} threshold session finished", cfg.kind());
                return self.running(io);
            }
        }

        match cfg.kind() {
            ThresholdKind::Detect => Phase::ConfiguringDetect(cfg),
            ThresholdKind::Close => Phase::ConfiguringClose(cfg),
        }
    }
}
