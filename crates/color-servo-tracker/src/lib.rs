//! HSV color-blob target tracker.
//!
//! Pipeline per frame: Gaussian blur -> RGB-to-HSV -> band threshold ->
//! mask blur -> moments -> centroid. A blob is reported only when its mask
//! mass is strictly above the configured noise floor; anything else is
//! `Detection::NotFound`. A shutdown request short-circuits the whole
//! pipeline to `Detection::Terminate`.

mod params;
mod tracker;

pub use params::TrackerParams;
pub use tracker::{ColorTracker, Detection, MassClass, TargetBlob, TrackDebug};
