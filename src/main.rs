mod hardware;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use std::path::PathBuf;
use std::time::Duration;

use metal_detector::simulator::SimulatedIo;
use metal_detector::ticker::Ticker;
use metal_detector::{Config, Controller, logging};

use hardware::BoardIo;

#[derive(Debug, Parser)]
#[command(name = "MetalDetector", about = "Two-coil metal detector control loop")]
struct Args {
    /// JSON file with `detector` and `hardware` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run against the built-in scene instead of the board
    #[arg(long)]
    simulate: bool,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_level).context("installing logger")?;

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    info!("Starting metal detector ({} ms tick)", config.detector.tick_ms);

    let tick = Duration::from_millis(config.detector.tick_ms);
    let mut controller = Controller::new(config.detector.clone());

    if args.simulate {
        let mut io = SimulatedIo::demo().realtime(Ticker::new(tick));
        controller.run(&mut io, args.ticks);
    } else {
        let mut io = BoardIo::new(config.hardware.clone(), tick)?;
        controller.run(&mut io, args.ticks);
    }

    info!("{}", serde_json::to_string(&controller.snapshot())?);
    Ok(())
}
