use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Timing and threshold constants of the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub tick_ms: u64,
    pub deadzone_spacing: u16, // Full width of the dead zone around each threshold
    pub press_stability: u8,   // Consecutive high polls before a press counts
    pub settle_ticks: u8,      // Dwell before a new zone is counted
    pub display_phase_ticks: u16,
    pub calibration_samples: usize,
    pub announce_ticks: u16, // How long each banner word stays up
    pub detect_threshold: u16,
    pub close_threshold: u16,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            tick_ms: 20,
            deadzone_spacing: 30,
            press_stability: 5,
            settle_ticks: 25,
            display_phase_ticks: 50,
            calibration_samples: 1000,
            announce_ticks: 50,
            detect_threshold: 50,
            close_threshold: 100,
        }
    }
}

impl DetectorConfig {
    pub fn margin(&self) -> u16 {
        self.deadzone_spacing / 2
    }
}

/// Board wiring. Button pins are ordered left, right, up, down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    pub button_pins: [u8; 4],
    pub selector_pin: u8,
    pub led_pins: Vec<u8>,
    pub coil_adc: [u8; 2],
    pub live_value_adc: u8,
    pub oled_bus: u8,
    pub oled_address: u16,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        HardwareConfig {
            button_pins: [23, 24, 25, 18],
            selector_pin: 15,
            led_pins: vec![16, 20, 21, 26, 19, 13, 6, 5],
            coil_adc: [0, 1],
            live_value_adc: 2,
            oled_bus: 1,
            oled_address: 0x3C,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detector: DetectorConfig,
    pub hardware: HardwareConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: String::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.detector;
        if d.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".into()));
        }
        if d.press_stability == 0 {
            return Err(ConfigError::Invalid("press_stability must be positive".into()));
        }
        if d.display_phase_ticks == 0 {
            return Err(ConfigError::Invalid("display_phase_ticks must be positive".into()));
        }
        if d.calibration_samples == 0 {
            return Err(ConfigError::Invalid("calibration_samples must be positive".into()));
        }
        if self.hardware.led_pins.len() > 16 {
            return Err(ConfigError::Invalid("at most 16 LED pins".into()));
        }
        Ok(())
    }
}
