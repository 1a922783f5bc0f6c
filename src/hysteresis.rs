use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Detection {
    NotDetected,
    Far,
    Close,
}

// Thresholds are drops below `baseline`, not raw levels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelState {
    pub baseline: u16,
    pub detect_threshold: u16,
    pub close_threshold: u16,
    pub digital: bool,
    pub is_close: bool,
}

impl ChannelState {
    pub fn new(detect_threshold: u16, close_threshold: u16) -> Self {
        ChannelState {
            baseline: 0,
            detect_threshold,
            close_threshold,
            digital: false,
            is_close: false,
        }
    }

    pub fn detection(&self) -> Detection {
        match (self.digital, self.is_close) {
            (false, _) => Detection::NotDetected,
            (true, false) => Detection::Far,
            (true, true) => Detection::Close,
        }
    }

    /// Feeds one sample through the dead-zone hysteresis.
    ///
    /// `margin` is half the dead-zone width: entering a state needs the
    /// sample `margin` past the nominal boundary, leaving it needs the same
    /// distance back the other way.
    pub fn update(&mut self, sample: u16, margin: u16) -> Detection {
        let (digital, is_close) = step(
            (self.digital, self.is_close),
            sample,
            self.baseline,
            self.detect_threshold,
            self.close_threshold,
            margin,
        );

        if digital != self.digital || is_close != self.is_close {
            debug!(
                "sample {} vs baseline {}: digital {} -> {}, close {} -> {}",
                sample, self.baseline, self.digital, digital, self.is_close, is_close
            );
        }

        self.digital = digital;
        self.is_close = is_close;
        self.detection()
    }
}

/// Pure transition function. Arithmetic is signed so a threshold larger
/// than the baseline simply never triggers instead of wrapping.
pub fn step(
    previous: (bool, bool),
    sample: u16,
    baseline: u16,
    detect_threshold: u16,
    close_threshold: u16,
    margin: u16,
) -> (bool, bool) {
    let sample = sample as i32;
    let margin = margin as i32;
    let detect_level = baseline as i32 - detect_threshold as i32;
    let close_level = baseline as i32 - close_threshold as i32;

    match previous {
        (false, _) => (sample < detect_level - margin, false),
        (true, false) => {
            if sample > detect_level + margin {
                (false, false)
            } else if sample < close_level - margin {
                (true, true)
            } else {
                (true, false)
            }
        }
        (true, true) => (true, !(sample > close_level + margin)),
    }
}
