use serde::{Deserialize, Serialize};

use color_servo_core::HsvBand;

/// Configuration for the color-blob tracker.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackerParams {
    /// HSV band the target color must fall into (inclusive on all edges).
    #[serde(default)]
    pub band: HsvBand,
    /// Minimum mask mass for a detection. Mass is the byte sum of the
    /// smoothed mask, so this is a noise floor, not a pixel count. The
    /// comparison is strict: mass exactly at the floor is still a miss.
    #[serde(default = "default_min_mass")]
    pub min_mass: f64,
    /// Relative half-width of the in-band window used only for the
    /// diagnostic mass classification against a calibrated reference.
    /// When the tracker runs under the agent, this is overwritten with the
    /// control policy's dead band so the two can never disagree.
    #[serde(default = "default_size_band")]
    pub size_band: f64,
}

fn default_min_mass() -> f64 {
    5000.0
}

fn default_size_band() -> f64 {
    0.25
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            band: HsvBand::default(),
            min_mass: default_min_mass(),
            size_band: default_size_band(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let p: TrackerParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.band, HsvBand::green());
        assert_eq!(p.min_mass, 5000.0);
        assert_eq!(p.size_band, 0.25);
    }

    #[test]
    fn round_trips_through_json() {
        let mut p = TrackerParams::default();
        p.band = HsvBand::orange();
        p.min_mass = 1200.0;
        let s = serde_json::to_string(&p).unwrap();
        let q: TrackerParams = serde_json::from_str(&s).unwrap();
        assert_eq!(q.band, HsvBand::orange());
        assert_eq!(q.min_mass, 1200.0);
    }
}
