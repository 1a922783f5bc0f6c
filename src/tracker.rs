use log::debug;
use serde::Serialize;

use crate::display::{DisplayRequest, Message};
use crate::zone::Zone;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoneCounters {
    pub far_left: u8,
    pub left: u8,
    pub center: u8,
    pub right: u8,
    pub far_right: u8,
}

impl ZoneCounters {
    pub fn get(&self, zone: Zone) -> u8 {
        match zone {
            Zone::FarLeft => self.far_left,
            Zone::Left => self.left,
            Zone::Center => self.center,
            Zone::Right => self.right,
            Zone::FarRight => self.far_right,
        }
    }

    fn bump(&mut self, zone: Zone) {
        let counter = match zone {
            Zone::FarLeft => &mut self.far_left,
            Zone::Left => &mut self.left,
            Zone::Center => &mut self.center,
            Zone::Right => &mut self.right,
            Zone::FarRight => &mut self.far_right,
        };
        *counter = counter.wrapping_add(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayCycle {
    pub zone: Zone,
    pub showing_value: bool,
}

impl DisplayCycle {
    pub fn start() -> Self {
        DisplayCycle {
            zone: Zone::Left,
            showing_value: false,
        }
    }

    pub fn next(self) -> Self {
        if !self.showing_value {
            return DisplayCycle {
                zone: self.zone,
                showing_value: true,
            };
        }
        let i = (self.zone.index() + 1) % Zone::ALL.len();
        DisplayCycle {
            zone: Zone::ALL[i],
            showing_value: false,
        }
    }
}

// A zone counts after `settle_ticks` consecutive ticks, once per pass.
#[derive(Debug, Clone)]
pub struct ObjectCountTracker {
    counters: ZoneCounters,
    last_zone: Option<Zone>,
    current_zone: Option<Zone>,
    settle_count: u8,
    settle_ticks: u8,
    cycle: DisplayCycle,
    phase_ticks: u16,
    phase_elapsed: u16,
}

impl ObjectCountTracker {
    pub fn new(settle_ticks: u8, phase_ticks: u16) -> Self {
        ObjectCountTracker {
            counters: ZoneCounters::default(),
            last_zone: None,
            current_zone: None,
            settle_count: 0,
            settle_ticks,
            cycle: DisplayCycle::start(),
            phase_ticks,
            phase_elapsed: 0,
        }
    }

    pub fn counters(&self) -> ZoneCounters {
        self.counters
    }

    pub fn last_zone(&self) -> Option<Zone> {
        self.last_zone
    }

    pub fn settle_count(&self) -> u8 {
        self.settle_count
    }

    pub fn tick(&mut self, left: bool, right: bool, is_close: bool) -> Option<Zone> {
        let counted = self.count(Zone::classify(left, right, is_close));

        self.phase_elapsed += 1;
        if self.phase_elapsed >= self.phase_ticks {
            self.phase_elapsed = 0;
            self.cycle = self.cycle.next();
        }

        counted
    }

    fn count(&mut self, zone: Option<Zone>) -> Option<Zone> {
        let Some(zone) = zone else {
            self.last_zone = None;
            self.current_zone = None;
            self.settle_count = 0;
            return None;
        };

        if self.current_zone != Some(zone) {
            self.current_zone = Some(zone);
            self.settle_count = 0;
        }
        self.settle_count = self.settle_count.saturating_add(1);

        if self.last_zone != Some(zone) && self.settle_count >= self.settle_ticks {
            self.counters.bump(zone);
            self.last_zone = Some(zone);
            self.settle_count = 0;
            debug!("counted {:?}, now {}", zone, self.counters.get(zone));
            return Some(zone);
        }
        None
    }

    pub fn display(&self) -> DisplayRequest {
        if self.cycle.showing_value {
            DisplayRequest::number(self.counters.get(self.cycle.zone) as u16)
        } else {
            DisplayRequest::Canned(Message::for_zone(Some(self.cycle.zone)))
        }
    }
}
