//! Stateful flight-control policy for color-blob visual servoing.
//!
//! Converts per-frame detections into incremental attitude/throttle
//! commands: PID on the normalized image-plane offset (yaw when the target
//! sits in the outer thirds of the frame, roll otherwise, throttle always)
//! and a three-state bang-bang pitch against a calibrated target size.

mod pid;
mod policy;

pub use pid::{pid_axis, PidGains};
pub use policy::{
    Calibration, Command, ControlState, Policy, PolicyConfig, PolicyStep, VehicleState,
};
