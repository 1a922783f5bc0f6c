//! Sensing-and-decision engine of a two-coil metal detector.
//!
//! Everything here is pure state driven one 20 ms tick at a time through
//! [`io::DetectorIo`]; the binary wires that trait to the board.

pub mod calibration;
pub mod config;
pub mod configurator;
pub mod controller;
pub mod debounce;
pub mod display;
pub mod hysteresis;
pub mod io;
pub mod led;
pub mod logging;
pub mod simulator;
pub mod ticker;
pub mod tracker;
pub mod zone;

pub use config::{Config, DetectorConfig, HardwareConfig};
pub use controller::{Controller, Mode, Phase};
pub use display::{DisplayRequest, Message};
pub use io::{Button, Channel, DetectorIo};
