use log::info;
use serde::Serialize;

use crate::display::{Announcer, DisplayRequest, Message};
use crate::io::Channel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThresholdKind {
    Detect,
    Close,
}

impl ThresholdKind {
    fn banner(self) -> Message {
        match self {
            ThresholdKind::Detect => Message::Threshold,
            ThresholdKind::Close => Message::Close,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Intro,
    Live,
    Outro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Show(DisplayRequest),
    Latched {
        channel: Channel,
        value: u16,
        display: DisplayRequest,
    },
    Finished,
}

// No cancel path: a session only ends through confirmation.
#[derive(Debug, Clone)]
pub struct Configurator {
    kind: ThresholdKind,
    stage: Stage,
    announcer: Announcer,
    announce_ticks: u16,
}

impl Configurator {
    pub fn new(kind: ThresholdKind, announce_ticks: u16) -> Self {
        let mut announcer = Announcer::new();
        announcer.push(DisplayRequest::Canned(Message::Set), announce_ticks);
        announcer.push(DisplayRequest::Canned(Message::Adc), announce_ticks);
        announcer.push(DisplayRequest::Canned(kind.banner()), announce_ticks);

        Configurator {
            kind,
            stage: Stage::Intro,
            announcer,
            announce_ticks,
        }
    }

    pub fn kind(&self) -> ThresholdKind {
        self.kind
    }

    pub fn is_live(&self) -> bool {
        self.stage == Stage::Live
    }

    pub fn live_display(channel: Channel, live: u16) -> DisplayRequest {
        DisplayRequest::Numeric {
            value: (channel.number() << 12) | (live & 0x0FFF),
            decimal_points: 0b1000,
        }
    }

    // `confirmed` is only polled while the live readout is up.
    pub fn tick<F>(&mut self, selector: bool, live: u16, confirmed: F) -> Step
    where
        F: FnOnce() -> bool,
    {
        if self.stage == Stage::Intro {
            if let Some(request) = self.announcer.tick() {
                if self.announcer.is_done() {
                    self.stage = Stage::Live;
                }
                return Step::Show(request);
            }
            self.stage = Stage::Live;
        }

        if self.stage == Stage::Live {
            let channel = if selector { Channel::Two } else { Channel::One };
            let display = Self::live_display(channel, live);
            if !confirmed() {
                return Step::Show(display);
            }

            info!("{:?} threshold of channel {} set to {}", self.kind, channel.number(), live);
            let adc = match channel {
                Channel::One => Message::Adc1,
                Channel::Two => Message::Adc2,
            };
            self.announcer.push(DisplayRequest::Canned(adc), self.announce_ticks);
            self.announcer.push(DisplayRequest::Canned(Message::Set), self.announce_ticks);
            self.stage = Stage::Outro;
            return Step::Latched {
                channel,
                value: live,
                display,
            };
        }

        match self.announcer.tick() {
            Some(request) => Step::Show(request),
            None => Step::Finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_intro(cfg: &mut Configurator) -> Vec<DisplayRequest> {
        let mut shown = Vec::new();
        while !cfg.is_live() {
            match cfg.tick(false, 0, || panic!("confirm polled during intro")) {
                Step::Show(r) => shown.push(r),
                other => panic!("unexpected {:?}", other),
            }
        }
        shown
    }

    #[test]
    fn intro_banners_then_live_readout() {
        let mut cfg = Configurator::new(ThresholdKind::Close, 2);
        let shown = run_intro(&mut cfg);
        assert_eq!(
            shown,
            vec![
                DisplayRequest::Canned(Message::Set),
                DisplayRequest::Canned(Message::Set),
                DisplayRequest::Canned(Message::Adc),
                DisplayRequest::Canned(Message::Adc),
                DisplayRequest::Canned(Message::Close),
                DisplayRequest::Canned(Message::Close),
            ]
        );
        assert_eq!(
            cfg.tick(true, 0x1234, || false),
            Step::Show(DisplayRequest::Numeric {
                value: 0x2234,
                decimal_points: 0b1000
            })
        );
    }

    #[test]
    fn confirm_latches_full_value_and_channel() {
        let mut cfg = Configurator::new(ThresholdKind::Detect, 1);
        run_intro(&mut cfg);
        assert!(matches!(cfg.tick(false, 70, || false), Step::Show(_)));
        match cfg.tick(true, 0x1ABC, || true) {
            Step::Latched { channel, value, .. } => {
                assert_eq!(channel, Channel::Two);
                assert_eq!(value, 0x1ABC);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cfg.tick(false, 0, || panic!("polled after latch")), Step::Show(DisplayRequest::Canned(Message::Adc2)));
        assert_eq!(cfg.tick(false, 0, || false), Step::Show(DisplayRequest::Canned(Message::Set)));
        assert_eq!(cfg.tick(false, 0, || false), Step::Finished);
    }

    #[test]
    fn never_finishes_without_confirm() {
        let mut cfg = Configurator::new(ThresholdKind::Detect, 0);
        for _ in 0..10_000 {
            assert!(matches!(cfg.tick(false, 5, || false), Step::Show(_)));
        }
        assert!(cfg.is_live());
    }
}
