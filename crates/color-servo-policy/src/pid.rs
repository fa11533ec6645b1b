use serde::{Deserialize, Serialize};

/// Gains for one control axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: 0.25,
            ki: 0.0,
            kd: 0.25,
        }
    }
}

/// Simplified PID step:
///
/// `out = kp*err + ki*(err + prev_err) + kd*(err - prev_err)`
///
/// The integral term uses only the two most recent errors rather than a
/// running sum. The gains were tuned against exactly this form, so it must
/// not be upgraded to an accumulating integral.
///
/// `_prev_out` is unused; it is kept so the call shape matches controllers
/// that feed the previous output back in, and so existing gain sets keep
/// their meaning.
#[inline]
pub fn pid_axis(_prev_out: f32, err: f32, prev_err: f32, gains: &PidGains) -> f32 {
    gains.kp * err + gains.ki * (err + prev_err) + gains.kd * (err - prev_err)
}
