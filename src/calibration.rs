use crate::io::Channel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baselines {
    pub channel1: u16,
    pub channel2: u16,
}

impl Baselines {
    pub fn total(&self) -> u16 {
        self.channel1.saturating_add(self.channel2)
    }
}

/// Samples both coils `samples` times, alternating, and keeps the lowest
/// reading of each. The lowest reading is the emptiest field the coil saw,
/// so a stray high spike cannot pull the baseline up.
pub fn calibrate<F>(samples: usize, mut sample: F) -> Baselines
where
    F: FnMut(Channel) -> u16,
{
    let mut min1 = u16::MAX;
    let mut min2 = u16::MAX;

    for _ in 0..samples {
        min1 = min1.min(sample(Channel::One));
        min2 = min2.min(sample(Channel::Two));
    }

    Baselines {
        channel1: min1,
        channel2: min2,
    }
}
