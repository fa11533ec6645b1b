//! Step the servo agent over recorded frames and emit a JSON run report.
//!
//! Usage:
//!   cargo run -p color-servo --example track_frames -- [config.json] frame1.png frame2.png ...
//!
//! The optional leading JSON file is a serialized `AgentConfig`. With
//! `--features tracing` the run installs a tracing subscriber plus a `log`
//! bridge (so the library's log lines land in the same output) and opens a
//! span per frame; without it, the plain elapsed-time logger is used.

use std::{env, fs, time::Instant};

use color_servo::{Agent, AgentConfig, Command, PolicyStep, VehicleState};
use image::ImageReader;
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::{info, info_span};
#[cfg(feature = "tracing")]
use tracing_log::LogTracer;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize)]
struct FrameReport {
    frame: usize,
    path: String,
    duration_ms: u64,
    /// The command issued, or `None` on the terminating frame.
    command: Option<Command>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    frames: Vec<FrameReport>,
    terminated: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let config: AgentConfig = if args.first().is_some_and(|a| a.ends_with(".json")) {
        let raw = fs::read_to_string(args.remove(0))?;
        serde_json::from_str(&raw)?
    } else {
        AgentConfig::default()
    };

    let mut agent = Agent::new(config);
    let mut report = RunReport {
        frames: Vec::new(),
        terminated: false,
    };

    for (index, path) in args.iter().enumerate() {
        let frame_no = index + 1;

        #[cfg(feature = "tracing")]
        let span = info_span!("frame", index = frame_no);
        #[cfg(feature = "tracing")]
        let _guard = span.enter();

        let rgb = ImageReader::open(path)?.decode()?.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);

        let t0 = Instant::now();
        let step = agent.step(rgb.as_raw(), width, height, &VehicleState::default())?;
        let duration_ms = t0.elapsed().as_millis() as u64;

        #[cfg(feature = "tracing")]
        info!(duration_ms, "frame stepped");
        #[cfg(not(feature = "tracing"))]
        log::info!("frame {frame_no} stepped duration_ms={duration_ms}");

        match step {
            PolicyStep::Command(cmd) => report.frames.push(FrameReport {
                frame: frame_no,
                path: path.clone(),
                duration_ms,
                command: Some(cmd),
            }),
            PolicyStep::Terminate => {
                report.frames.push(FrameReport {
                    frame: frame_no,
                    path: path.clone(),
                    duration_ms,
                    command: None,
                });
                report.terminated = true;
                break;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Ignore errors if a logger/subscriber was already installed (e.g. when
/// running multiple examples in the same process).
fn init_logging() {
    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init();
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = color_servo::core::init_with_level(log::LevelFilter::Info);
    }
}
