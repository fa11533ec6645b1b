use log::{debug, info};
use serde::{Deserialize, Serialize};

use color_servo_core::{FrameFormatError, RgbImageView, ShutdownHandle};
use color_servo_policy::{ControlState, Policy, PolicyConfig, PolicyStep, VehicleState};
use color_servo_tracker::{ColorTracker, TrackDebug, TrackerParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors surfaced to the vehicle-interface host. Detection misses are not
/// errors; only malformed input ends up here. A failed frame is skipped by
/// the caller, it never turns into a command.
#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    BadFrame(#[from] FrameFormatError),
}

/// Combined configuration for one control session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub tracker: TrackerParams,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Boundary entry point: one tracker plus one policy plus the session
/// state, invoked once per frame by the host loop.
///
/// Single-threaded by contract: a host that parallelizes frames must
/// serialize calls, since state-update order defines the control
/// semantics.
pub struct Agent {
    tracker: ColorTracker,
    policy: Policy,
    state: ControlState,
}

impl Agent {
    pub fn new(mut config: AgentConfig) -> Self {
        // One band, one knob: the tracker's diagnostic mass classification
        // mirrors the policy's pitch dead band, so the annotation can never
        // disagree with the pitch actually commanded.
        config.tracker.size_band = config.policy.size_band;
        Self {
            tracker: ColorTracker::new(config.tracker),
            policy: Policy::new(config.policy),
            state: ControlState::new(),
        }
    }

    /// Wire an externally owned shutdown handle (e.g. from a Ctrl-C
    /// handler) into the tracker.
    pub fn with_shutdown(mut self, shutdown: ShutdownHandle) -> Self {
        self.tracker = self.tracker.with_shutdown(shutdown);
        self
    }

    /// Handle polled every frame; requesting it makes the next step return
    /// [`PolicyStep::Terminate`].
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.tracker.shutdown_handle()
    }

    #[inline]
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    #[inline]
    pub fn tracker(&self) -> &ColorTracker {
        &self.tracker
    }

    /// Process one frame: raw interleaved RGB bytes plus the vehicle
    /// telemetry snapshot, returning the 5-axis command or the terminate
    /// signal. The buffer must hold exactly `width * height * 3` bytes.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, bytes, vehicle), fields(width, height))
    )]
    pub fn step(
        &mut self,
        bytes: &[u8],
        width: usize,
        height: usize,
        vehicle: &VehicleState,
    ) -> Result<PolicyStep, AgentError> {
        Ok(self.step_debug(bytes, width, height, vehicle)?.0)
    }

    /// Same as [`step`](Self::step) but also returns the tracker's debug
    /// artifacts (smoothed mask, mass classification) for display/dump.
    pub fn step_debug(
        &mut self,
        bytes: &[u8],
        width: usize,
        height: usize,
        vehicle: &VehicleState,
    ) -> Result<(PolicyStep, TrackDebug), AgentError> {
        let frame = RgbImageView::new(bytes, width, height)?;

        if vehicle.button != 0 {
            debug!("pass button detected [ {} ]", vehicle.button);
        }

        let reference = self.state.calibration.reference();
        let (detection, track_debug) = self.tracker.track_debug(&frame, reference);

        let step = self
            .policy
            .step(detection, width, height, vehicle, &mut self.state);

        if let PolicyStep::Command(cmd) = &step {
            info!(
                "battery={:2}% pitch={:+.3} roll={:+.3} throttle={:+.3} yaw={:+.3}",
                vehicle.battery_percent, cmd.pitch, cmd.roll, cmd.throttle, cmd.yaw
            );
        }

        Ok((step, track_debug))
    }
}
