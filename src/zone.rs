use serde::Serialize;

/// Where an object sits relative to the two coils.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Zone {
    FarLeft,
    Left,
    Center,
    Right,
    FarRight,
}

impl Zone {
    pub const ALL: [Zone; 5] = [Zone::FarLeft, Zone::Left, Zone::Center, Zone::Right, Zone::FarRight];

    /// Channel one is the left coil, channel two the right one.
    ///
    /// `is_close` is one flag for both sides, the OR of the two coils.
    pub fn classify(left: bool, right: bool, is_close: bool) -> Option<Zone> {
        match (left, right) {
            (false, false) => None,
            (true, true) => Some(Zone::Center),
            (true, false) if is_close => Some(Zone::Left),
            (true, false) => Some(Zone::FarLeft),
            (false, true) if is_close => Some(Zone::Right),
            (false, true) => Some(Zone::FarRight),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Zone::FarLeft => 0,
            Zone::Left => 1,
            Zone::Center => 2,
            Zone::Right => 3,
            Zone::FarRight => 4,
        }
    }
}
