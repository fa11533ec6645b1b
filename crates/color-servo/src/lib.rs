//! High-level facade crate for the `color-servo-*` workspace.
//!
//! Closes a visual-servoing loop for an aerial vehicle: each camera frame
//! is segmented to find a colored target, and the target's image-plane
//! offset and apparent size drive a PID-based attitude/throttle command
//! handed back to the vehicle.
//!
//! This crate provides:
//! - stable re-exports of the underlying crates
//! - the [`Agent`] boundary entry point the vehicle-interface host calls
//!   once per frame (raw pixel buffer + telemetry in, command out)
//! - (feature `cli`) a runner binary that steps the agent over image files
//!
//! ## Quickstart
//!
//! ```no_run
//! use color_servo::{Agent, AgentConfig, PolicyStep, VehicleState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut agent = Agent::new(AgentConfig::default());
//! let (width, height) = (320usize, 240usize);
//! let frame = vec![0u8; width * height * 3];
//!
//! match agent.step(&frame, width, height, &VehicleState::default())? {
//!     PolicyStep::Command(cmd) => println!("roll={} yaw={}", cmd.roll, cmd.yaw),
//!     PolicyStep::Terminate => println!("session over"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `color_servo::core`: pixel-level types (frames, masks, HSV, moments).
//! - `color_servo::tracker`: per-frame color-blob target tracker.
//! - `color_servo::policy`: PID axis law and the stateful control policy.

pub use color_servo_core as core;
pub use color_servo_policy as policy;
pub use color_servo_tracker as tracker;

pub use color_servo_core::{FrameFormatError, HsvBand, RgbImageView, ShutdownHandle};
pub use color_servo_policy::{
    Calibration, Command, ControlState, PidGains, Policy, PolicyConfig, PolicyStep, VehicleState,
};
pub use color_servo_tracker::{
    ColorTracker, Detection, MassClass, TargetBlob, TrackDebug, TrackerParams,
};

mod agent;

pub use agent::{Agent, AgentConfig, AgentError};
