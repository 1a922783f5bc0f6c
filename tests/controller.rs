use metal_detector::controller::Phase;
use metal_detector::simulator::SimulatedIo;
use metal_detector::{Button, Channel, Controller, DetectorConfig, DetectorIo, DisplayRequest, Message, Mode};

/// Scripted board. Each coil cycles through its sample pattern, one entry
/// per read, and every tick must issue exactly one display request.
struct FakeIo {
    pattern: [Vec<u16>; 2],
    reads: [usize; 2],
    held: [bool; 4],
    selector: bool,
    live: u16,
    displays: Vec<DisplayRequest>,
    intensities: Vec<u16>,
    displays_this_tick: usize,
}

impl FakeIo {
    fn new(baseline: [u16; 2]) -> Self {
        FakeIo {
            pattern: [vec![baseline[0]], vec![baseline[1]]],
            reads: [0, 0],
            held: [false; 4],
            selector: false,
            live: 0,
            displays: Vec::new(),
            intensities: Vec::new(),
            displays_this_tick: 0,
        }
    }

    fn set_samples(&mut self, s1: u16, s2: u16) {
        self.pattern = [vec![s1], vec![s2]];
    }

    fn last_display(&self) -> DisplayRequest {
        *self.displays.last().expect("no display request yet")
    }
}

impl DetectorIo for FakeIo {
    fn sample_channel(&mut self, channel: Channel) -> u16 {
        let i = channel.index();
        let value = self.pattern[i][self.reads[i] % self.pattern[i].len()];
        self.reads[i] += 1;
        value
    }

    fn read_button(&mut self, button: Button) -> bool {
        self.held[button.index()]
    }

    fn read_mode_selector(&mut self) -> bool {
        self.selector
    }

    fn read_live_value(&mut self) -> u16 {
        self.live
    }

    fn request_display(&mut self, request: DisplayRequest) {
        self.displays.push(request);
        self.displays_this_tick += 1;
    }

    fn set_intensity(&mut self, level: u16) {
        self.intensities.push(level);
    }

    fn await_tick(&mut self) {
        assert_eq!(self.displays_this_tick, 1, "one display request per tick");
        self.displays_this_tick = 0;
    }
}

fn config() -> DetectorConfig {
    DetectorConfig {
        announce_ticks: 1,
        calibration_samples: 20,
        ..DetectorConfig::default()
    }
}

fn step(c: &mut Controller, io: &mut FakeIo, ticks: usize) {
    for _ in 0..ticks {
        c.tick(io);
        io.await_tick();
    }
}

fn calibrated(baseline: [u16; 2]) -> (Controller, FakeIo) {
    let mut c = Controller::new(config());
    let mut io = FakeIo::new(baseline);
    for _ in 0..100 {
        if matches!(c.phase(), Phase::Running) {
            return (c, io);
        }
        step(&mut c, &mut io, 1);
    }
    panic!("calibration never finished");
}

fn press(c: &mut Controller, io: &mut FakeIo, button: Button) {
    io.held[button.index()] = true;
    step(c, io, 8);
    io.held[button.index()] = false;
    step(c, io, 2);
}

#[test]
fn calibration_announces_and_reports() {
    let mut c = Controller::new(config());
    let mut io = FakeIo::new([1000, 1100]);
    step(&mut c, &mut io, 5);
    assert!(matches!(c.phase(), Phase::Running));
    assert_eq!(
        io.displays,
        vec![
            DisplayRequest::Canned(Message::Calibrate),
            DisplayRequest::Canned(Message::Adc1),
            DisplayRequest::number(1000),
            DisplayRequest::Canned(Message::Adc2),
            DisplayRequest::number(1100),
        ]
    );
}

#[test]
fn calibration_takes_minimum_of_thousand_samples() {
    let mut c = Controller::new(DetectorConfig::default());
    let mut io = FakeIo::new([1000, 1200]);
    io.pattern[0] = vec![1000, 950];
    // banner for 50 ticks, then the sampling tick
    step(&mut c, &mut io, 51);
    assert_eq!(io.reads[0], 1000);
    let b = c.baselines().expect("calibrated");
    assert_eq!(b.channel1, 950);
    assert_eq!(b.channel2, 1200);
    assert_eq!(c.channel(Channel::One).baseline, 950);
}

#[test]
fn mode_buttons_wrap_right_and_clamp_left() {
    let (mut c, mut io) = calibrated([1000, 1000]);
    assert_eq!(c.mode(), Mode::Position);
    press(&mut c, &mut io, Button::Left);
    assert_eq!(c.mode(), Mode::Position);
    press(&mut c, &mut io, Button::Right);
    assert_eq!(c.mode(), Mode::Strength);
    press(&mut c, &mut io, Button::Right);
    assert_eq!(c.mode(), Mode::ObjectCount);
    press(&mut c, &mut io, Button::Right);
    assert_eq!(c.mode(), Mode::Position);
    press(&mut c, &mut io, Button::Right);
    press(&mut c, &mut io, Button::Left);
    assert_eq!(c.mode(), Mode::Position);
}

#[test]
fn position_mode_follows_coils() {
    let (mut c, mut io) = calibrated([1000, 1000]);
    step(&mut c, &mut io, 1);
    assert_eq!(io.last_display(), DisplayRequest::Canned(Message::NotDetected));

    io.set_samples(900, 1000);
    step(&mut c, &mut io, 1);
    assert_eq!(io.last_display(), DisplayRequest::Canned(Message::FarLeft));

    io.set_samples(870, 1000);
    step(&mut c, &mut io, 1);
    assert_eq!(io.last_display(), DisplayRequest::Canned(Message::Left));

    io.set_samples(870, 870);
    step(&mut c, &mut io, 1);
    assert_eq!(io.last_display(), DisplayRequest::Canned(Message::Center));

    // left coil leaves its close band first, then detection altogether
    io.set_samples(1000, 870);
    step(&mut c, &mut io, 1);
    assert_eq!(io.last_display(), DisplayRequest::Canned(Message::Center));
    step(&mut c, &mut io, 1);
    assert_eq!(io.last_display(), DisplayRequest::Canned(Message::Right));

    io.set_samples(1000, 920);
    step(&mut c, &mut io, 1);
    assert_eq!(io.last_display(), DisplayRequest::Canned(Message::FarRight));
}

#[test]
fn closeness_applies_on_the_tick_it_is_reached() {
    let (mut c, mut io) = calibrated([1000, 1000]);
    step(&mut c, &mut io, 1);

    // straight from nothing to close: never shown or counted as far
    io.set_samples(870, 1000);
    step(&mut c, &mut io, 1);
    assert!(c.channel(Channel::One).is_close);
    assert_eq!(io.last_display(), DisplayRequest::Canned(Message::Left));

    step(&mut c, &mut io, 24);
    assert_eq!(c.counters().left, 1);
    assert_eq!(c.counters().far_left, 0);

    io.set_samples(1000, 1000);
    step(&mut c, &mut io, 1);
    assert!(!c.is_close());
    assert_eq!(io.last_display(), DisplayRequest::Canned(Message::NotDetected));
}

#[test]
fn detection_holds_inside_dead_zone() {
    let (mut c, mut io) = calibrated([1000, 1000]);
    io.set_samples(934, 1000);
    step(&mut c, &mut io, 1);
    assert!(c.channel(Channel::One).digital);
    io.set_samples(960, 1000);
    step(&mut c, &mut io, 5);
    assert!(c.channel(Channel::One).digital);
    io.set_samples(966, 1000);
    step(&mut c, &mut io, 1);
    assert!(!c.channel(Channel::One).digital);
}

#[test]
fn strength_and_meter_clamp_at_zero() {
    let (mut c, mut io) = calibrated([1000, 1000]);
    press(&mut c, &mut io, Button::Right);
    assert_eq!(c.mode(), Mode::Strength);

    io.set_samples(1010, 1000);
    step(&mut c, &mut io, 1);
    assert_eq!(io.last_display(), DisplayRequest::number(0));
    assert_eq!(*io.intensities.last().unwrap(), 0);

    io.set_samples(900, 950);
    step(&mut c, &mut io, 1);
    assert_eq!(io.last_display(), DisplayRequest::number(150));
    // 2000 / 16 = 125 mV per LED
    assert_eq!(*io.intensities.last().unwrap(), 0x8000);
}

#[test]
fn object_count_mode_counts_a_pass_once() {
    let (mut c, mut io) = calibrated([1000, 1000]);
    press(&mut c, &mut io, Button::Right);
    press(&mut c, &mut io, Button::Right);
    assert_eq!(c.mode(), Mode::ObjectCount);

    io.set_samples(900, 900);
    step(&mut c, &mut io, 24);
    assert_eq!(c.counters().center, 0);
    step(&mut c, &mut io, 1);
    assert_eq!(c.counters().center, 1);
    step(&mut c, &mut io, 200);
    assert_eq!(c.counters().center, 1);

    // a full turn of the rotating display shows the center title and count
    io.set_samples(1000, 1000);
    step(&mut c, &mut io, 500);
    let shown = &io.displays[io.displays.len() - 500..];
    assert!(shown.contains(&DisplayRequest::Canned(Message::Center)));
    assert!(shown.contains(&DisplayRequest::number(1)));
    assert!(!shown.contains(&DisplayRequest::Canned(Message::NotDetected)));
}

#[test]
fn close_threshold_round_trip_for_channel_two() {
    let (mut c, mut io) = calibrated([1000, 1000]);
    press(&mut c, &mut io, Button::Down);
    assert!(matches!(c.phase(), Phase::ConfiguringClose(_)));

    io.selector = true;
    io.live = 200;
    step(&mut c, &mut io, 5);
    assert_eq!(
        io.last_display(),
        DisplayRequest::Numeric {
            value: 0x20C8,
            decimal_points: 0b1000
        }
    );

    press(&mut c, &mut io, Button::Down);
    step(&mut c, &mut io, 5);
    assert!(matches!(c.phase(), Phase::Running));

    assert_eq!(c.channel(Channel::Two).close_threshold, 200);
    assert_eq!(c.channel(Channel::Two).detect_threshold, 50);
    assert_eq!(c.channel(Channel::One).close_threshold, 100);
    assert_eq!(c.channel(Channel::One).detect_threshold, 50);
}

#[test]
fn configurator_blocks_everything_else() {
    let (mut c, mut io) = calibrated([1000, 1000]);
    press(&mut c, &mut io, Button::Up);
    assert!(matches!(c.phase(), Phase::ConfiguringDetect(_)));

    let reads = io.reads;
    io.set_samples(800, 800);
    press(&mut c, &mut io, Button::Right);
    press(&mut c, &mut io, Button::Down);
    step(&mut c, &mut io, 100);

    assert!(matches!(c.phase(), Phase::ConfiguringDetect(_)));
    assert_eq!(c.mode(), Mode::Position);
    assert_eq!(io.reads, reads, "coils are not sampled while configuring");
    assert!(!c.channel(Channel::One).digital);
}

#[test]
fn up_wins_and_down_follows_after_session() {
    let (mut c, mut io) = calibrated([1000, 1000]);
    io.held[Button::Up.index()] = true;
    io.held[Button::Down.index()] = true;
    step(&mut c, &mut io, 8);
    io.held = [false; 4];
    assert!(matches!(c.phase(), Phase::ConfiguringDetect(_)));

    io.live = 75;
    step(&mut c, &mut io, 5);
    press(&mut c, &mut io, Button::Up);
    step(&mut c, &mut io, 5);

    assert_eq!(c.channel(Channel::One).detect_threshold, 75);
    assert!(matches!(c.phase(), Phase::ConfiguringClose(_)));
}

#[test]
fn demo_scene_counts_every_zone() {
    let mut c = Controller::new(DetectorConfig::default());
    let mut io = SimulatedIo::demo().recording();
    // calibration (banners + report) then two full scene loops
    c.run(&mut io, Some(300 + 2 * 500));

    let counts = c.counters();
    assert!(counts.far_left >= 1);
    assert!(counts.left >= 1);
    assert!(counts.center >= 1);
    assert!(counts.right >= 1);
    assert!(counts.far_right >= 1);
    assert_eq!(io.displays.len(), 1300);
}
