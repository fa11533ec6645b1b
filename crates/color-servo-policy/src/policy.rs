use log::{debug, info};
use serde::{Deserialize, Serialize};

use color_servo_tracker::{Detection, TargetBlob};

use crate::pid::{pid_axis, PidGains};

/// Size-calibration state. The reference is set only by an explicit
/// calibration trigger; ordinary tracking never touches it, and once
/// calibrated there is no way back (re-triggering re-baselines).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Calibration {
    #[default]
    Uncalibrated,
    Calibrated { reference: f64 },
}

impl Calibration {
    pub fn reference(&self) -> Option<f64> {
        match *self {
            Calibration::Uncalibrated => None,
            Calibration::Calibrated { reference } => Some(reference),
        }
    }
}

/// 5-axis command handed back to the vehicle transport each frame. All
/// axes are always populated; neutral is all-zero. `zap` is reserved and
/// stays neutral in this design.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub zap: f32,
    pub roll: f32,
    pub pitch: f32,
    pub throttle: f32,
    pub yaw: f32,
}

impl Command {
    pub const NEUTRAL: Command = Command {
        zap: 0.0,
        roll: 0.0,
        pitch: 0.0,
        throttle: 0.0,
        yaw: 0.0,
    };
}

/// Outcome of one policy step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PolicyStep {
    Command(Command),
    /// The session is over; stop invoking the loop. No command is emitted.
    Terminate,
}

/// Telemetry snapshot the host passes in each frame. Only the input button
/// participates in control (calibration trigger); the rest feeds the
/// diagnostic status line.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct VehicleState {
    pub belly_camera: bool,
    /// Input-button code, 0 when idle.
    pub button: i32,
    /// Vehicle control-state code as reported by the firmware.
    pub ctrl_state: i32,
    pub battery_percent: i32,
    /// Attitude angles, degrees.
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
    /// Altitude, millimeters.
    pub altitude: i32,
    /// Horizontal velocities, mm/s.
    pub vx: f32,
    pub vy: f32,
}

/// Tuned policy constants. Every fraction that encodes the control policy
/// is a named, overridable field rather than an inline literal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Gains for the horizontal axis (shared by roll and yaw).
    #[serde(default)]
    pub gains_x: PidGains,
    /// Gains for the vertical axis (throttle).
    #[serde(default)]
    pub gains_y: PidGains,
    /// Fraction of the frame width forming each outer band. A centroid on
    /// or beyond the band boundary commands yaw instead of roll, rotating
    /// toward a badly off-center target instead of drifting sideways.
    #[serde(default = "default_outer_band")]
    pub outer_band: f32,
    /// Relative half-width of the pitch dead band around the calibrated
    /// reference size.
    #[serde(default = "default_size_band")]
    pub size_band: f64,
    /// Fixed pitch magnitude commanded outside the dead band. Bang-bang on
    /// purpose: a continuous law oscillates at the calibration boundary.
    #[serde(default = "default_pitch_step")]
    pub pitch_step: f32,
    /// Input-button code that stores the current blob mass as the
    /// "correct distance" reference.
    #[serde(default = "default_calibrate_button")]
    pub calibrate_button: i32,
}

fn default_outer_band() -> f32 {
    1.0 / 3.0
}

fn default_size_band() -> f64 {
    0.25
}

fn default_pitch_step() -> f32 {
    0.1
}

fn default_calibrate_button() -> i32 {
    12
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            gains_x: PidGains::default(),
            gains_y: PidGains::default(),
            outer_band: default_outer_band(),
            size_band: default_size_band(),
            pitch_step: default_pitch_step(),
            calibrate_button: default_calibrate_button(),
        }
    }
}

/// Per-session control state, constructed once at session start and owned
/// by the caller. Holds the previous frame's errors and commands plus the
/// calibration reference; consulted and updated only on frames where the
/// target was found.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlState {
    /// Number of frames with a found target so far.
    pub count: u64,
    /// Previous normalized horizontal/vertical errors.
    pub err_x: f32,
    pub err_y: f32,
    /// Previous commanded values.
    pub roll: f32,
    pub throttle: f32,
    pub yaw: f32,
    pub calibration: Calibration,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Per-frame decision logic. Stateless itself; all session state lives in
/// the caller-owned [`ControlState`].
pub struct Policy {
    config: PolicyConfig,
}

impl Policy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Turn one detection into a command, updating the session state.
    ///
    /// `width`/`height` are the dimensions of the frame the detection came
    /// from; errors are normalized against them, so both must be nonzero.
    /// Frames that reach this point through the agent have already been
    /// validated; direct callers own that precondition.
    pub fn step(
        &self,
        detection: Detection,
        width: usize,
        height: usize,
        vehicle: &VehicleState,
        state: &mut ControlState,
    ) -> PolicyStep {
        debug_assert!(
            width > 0 && height > 0,
            "frame dimensions must be nonzero"
        );
        match detection {
            Detection::Terminate => PolicyStep::Terminate,
            // Blind frames hold neutral and accumulate nothing: reacting to
            // noise is worse than hovering.
            Detection::NotFound => PolicyStep::Command(Command::NEUTRAL),
            Detection::Found(blob) => {
                PolicyStep::Command(self.step_found(blob, width, height, vehicle, state))
            }
        }
    }

    fn step_found(
        &self,
        blob: TargetBlob,
        width: usize,
        height: usize,
        vehicle: &VehicleState,
        state: &mut ControlState,
    ) -> Command {
        let half_w = width as f32 / 2.0;
        let half_h = height as f32 / 2.0;
        // Above center is negative, matching the vehicle's pitch-up sign.
        let err_x = (blob.x as f32 - half_w) / half_w;
        let err_y = -((blob.y as f32 - half_h) / half_h);

        let mut cmd = Command::NEUTRAL;

        // PID needs one frame of history; the very first found frame only
        // seeds the state.
        if state.count > 0 {
            let x = blob.x as f32;
            let w = width as f32;
            let outer = x <= w * self.config.outer_band || x >= w * (1.0 - self.config.outer_band);
            if outer {
                cmd.yaw = pid_axis(state.yaw, err_x, state.err_x, &self.config.gains_x);
            } else {
                cmd.roll = pid_axis(state.roll, err_x, state.err_x, &self.config.gains_x);
            }
            cmd.throttle = pid_axis(state.throttle, err_y, state.err_y, &self.config.gains_y);
        }

        if vehicle.button == self.config.calibrate_button {
            info!("storing reference size [ {:.0} ]", blob.mass);
            state.calibration = Calibration::Calibrated {
                reference: blob.mass,
            };
        }

        // Coarse forward/back control against the calibrated size. The
        // closed band is neutral; only strict crossings command pitch.
        if let Some(reference) = state.calibration.reference() {
            if blob.mass < reference * (1.0 - self.config.size_band) {
                cmd.pitch = -self.config.pitch_step;
            } else if blob.mass > reference * (1.0 + self.config.size_band) {
                cmd.pitch = self.config.pitch_step;
            }
        } else {
            debug!("uncalibrated, pitch held neutral");
        }

        state.err_x = err_x;
        state.err_y = err_y;
        state.roll = cmd.roll;
        state.throttle = cmd.throttle;
        state.yaw = cmd.yaw;
        state.count += 1;

        cmd
    }
}
