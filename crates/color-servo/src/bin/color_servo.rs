//! Offline runner: steps the servo agent over image files and prints the
//! command it would send each frame. Useful for tuning the HSV band and
//! gains against recorded footage without a vehicle in the loop.

use std::path::PathBuf;

use clap::Parser;
use log::{error, LevelFilter};

use color_servo::core::init_with_level;
use color_servo::{Agent, AgentConfig, HsvBand, PolicyStep, VehicleState};

#[derive(Parser, Debug)]
#[command(name = "color-servo", about = "Run the visual-servoing loop over image frames")]
struct Args {
    /// Input frames (PNG/JPEG), stepped in order.
    #[arg(required = true)]
    frames: Vec<PathBuf>,

    /// Inject the calibration button on this frame (1-based).
    #[arg(long, value_name = "N")]
    calibrate_on: Option<usize>,

    /// Track the orange preset band instead of the default green.
    #[arg(long)]
    orange: bool,

    /// Override the minimum detection mass.
    #[arg(long, value_name = "MASS")]
    min_mass: Option<f64>,

    /// Write each frame's smoothed threshold mask into this directory.
    #[arg(long, value_name = "DIR")]
    dump_masks: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log: LevelFilter,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    init_with_level(args.log)?;

    let mut config = AgentConfig::default();
    if args.orange {
        config.tracker.band = HsvBand::orange();
    }
    if let Some(mass) = args.min_mass {
        config.tracker.min_mass = mass;
    }

    let calibrate_button = config.policy.calibrate_button;
    let mut agent = Agent::new(config);

    let shutdown = agent.shutdown_handle();
    ctrlc::set_handler(move || shutdown.request())?;

    if let Some(dir) = &args.dump_masks {
        std::fs::create_dir_all(dir)?;
    }

    for (index, path) in args.frames.iter().enumerate() {
        let frame_no = index + 1;
        let rgb = image::ImageReader::open(path)?.decode()?.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);

        let vehicle = VehicleState {
            button: match args.calibrate_on {
                Some(n) if n == frame_no => calibrate_button,
                _ => 0,
            },
            ..VehicleState::default()
        };

        let (step, debug) = agent.step_debug(rgb.as_raw(), width, height, &vehicle)?;

        if let Some(dir) = &args.dump_masks {
            let mask = image::GrayImage::from_raw(width as u32, height as u32, debug.mask.data)
                .ok_or("mask dimensions out of range")?;
            mask.save(dir.join(format!("mask_{frame_no:04}.png")))?;
        }

        match step {
            PolicyStep::Command(cmd) => println!(
                "{} [{}] roll={:+.3} pitch={:+.3} throttle={:+.3} yaw={:+.3} ({:?})",
                frame_no,
                path.display(),
                cmd.roll,
                cmd.pitch,
                cmd.throttle,
                cmd.yaw,
                debug.mass_class,
            ),
            PolicyStep::Terminate => {
                println!("{frame_no} [{}] terminate requested, stopping", path.display());
                break;
            }
        }
    }

    Ok(())
}
