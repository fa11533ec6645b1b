use color_servo_core::{
    blur5_mask, blur5_rgb, mask_moments, threshold_band, Mask, RgbImageView, ShutdownHandle,
};
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::TrackerParams;

/// Segmented target blob: integer centroid in frame coordinates plus the
/// raw zeroth moment of the smoothed mask. Centroid coordinates are
/// truncated toward zero; since they are non-negative this equals floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetBlob {
    pub x: i32,
    pub y: i32,
    pub mass: f64,
}

/// Outcome of one tracking call. A tagged result keeps "no target" and
/// "stop the session" impossible to confuse with a valid centroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Detection {
    /// Target segmented with mass above the noise floor.
    Found(TargetBlob),
    /// No pixel mass worth reporting this frame.
    NotFound,
    /// Shutdown was requested; the caller must stop the control loop.
    Terminate,
}

/// Diagnostic classification of a blob's mass against a calibrated
/// reference size. Display-only; never feeds back into detection or
/// control math.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MassClass {
    Uncalibrated,
    Low,
    InBand,
    High,
}

impl MassClass {
    pub fn classify(mass: f64, reference: Option<f64>, band: f64) -> Self {
        match reference {
            None => MassClass::Uncalibrated,
            Some(r) if mass < r * (1.0 - band) => MassClass::Low,
            Some(r) if mass > r * (1.0 + band) => MassClass::High,
            Some(_) => MassClass::InBand,
        }
    }
}

/// Debug artifacts from one tracking call.
pub struct TrackDebug {
    /// Smoothed threshold mask the moments were taken over.
    pub mask: Mask,
    /// Mass classification against the supplied reference.
    pub mass_class: MassClass,
}

/// Per-frame color-blob tracker.
///
/// Stateless across frames apart from the shutdown handle; one instance can
/// serve a whole session.
pub struct ColorTracker {
    params: TrackerParams,
    shutdown: ShutdownHandle,
}

impl ColorTracker {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            params,
            shutdown: ShutdownHandle::new(),
        }
    }

    /// Use an externally owned shutdown handle (e.g. one wired to Ctrl-C).
    pub fn with_shutdown(mut self, shutdown: ShutdownHandle) -> Self {
        self.shutdown = shutdown;
        self
    }

    #[inline]
    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// Clone of the handle polled at the top of every call.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Track the target in one frame.
    ///
    /// `reference` is the calibrated target size, used only to annotate the
    /// debug log with a near/far classification; it has no effect on the
    /// detection itself.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn track(&self, frame: &RgbImageView<'_>, reference: Option<f64>) -> Detection {
        self.track_debug(frame, reference).0
    }

    /// Same as [`track`](Self::track) but also returns the smoothed mask
    /// and the diagnostic mass classification.
    pub fn track_debug(
        &self,
        frame: &RgbImageView<'_>,
        reference: Option<f64>,
    ) -> (Detection, TrackDebug) {
        // Checked before any pixel work so a quit request cannot be starved
        // by large frames, and regardless of whether a target is visible.
        if self.shutdown.is_requested() {
            let debug = TrackDebug {
                mask: Mask::zeros(frame.width(), frame.height()),
                mass_class: MassClass::Uncalibrated,
            };
            return (Detection::Terminate, debug);
        }

        let blurred = blur5_rgb(frame);
        let mask = threshold_band(&blurred.view(), &self.params.band);
        let mask = blur5_mask(&mask);

        let moments = mask_moments(&mask);
        let mass = moments.m00;

        let detection = match moments.centroid() {
            Some(c) if mass > self.params.min_mass => Detection::Found(TargetBlob {
                x: c.x as i32,
                y: c.y as i32,
                mass,
            }),
            _ => Detection::NotFound,
        };

        let mass_class = MassClass::classify(mass, reference, self.params.size_band);
        if let Detection::Found(blob) = detection {
            debug!(
                "target at ({}, {}) mass={:.0} class={:?}",
                blob.x, blob.y, blob.mass, mass_class
            );
        }

        (detection, TrackDebug { mask, mass_class })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_servo_core::HsvBand;

    const GREEN: [u8; 3] = [60, 190, 60];

    /// Frame with a solid square of the given color on black.
    fn frame_with_square(
        w: usize,
        h: usize,
        x0: usize,
        y0: usize,
        side: usize,
        color: [u8; 3],
    ) -> Vec<u8> {
        let mut buf = vec![0u8; w * h * 3];
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                let i = (y * w + x) * 3;
                buf[i..i + 3].copy_from_slice(&color);
            }
        }
        buf
    }

    fn tracker() -> ColorTracker {
        ColorTracker::new(TrackerParams {
            band: HsvBand::green(),
            // Low floor so modest synthetic squares register.
            min_mass: 500.0,
            ..TrackerParams::default()
        })
    }

    #[test]
    fn finds_centroid_of_green_square() {
        let buf = frame_with_square(64, 48, 20, 10, 12, GREEN);
        let frame = RgbImageView::new(&buf, 64, 48).unwrap();

        match tracker().track(&frame, None) {
            Detection::Found(blob) => {
                // Square spans x 20..32, y 10..22; blur keeps it symmetric.
                assert!((24..=27).contains(&blob.x), "x = {}", blob.x);
                assert!((14..=17).contains(&blob.y), "y = {}", blob.y);
                assert!(blob.mass > 500.0);
                assert!(blob.x >= 0 && (blob.x as usize) < 64);
                assert!(blob.y >= 0 && (blob.y as usize) < 48);
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn black_frame_is_not_found() {
        let buf = vec![0u8; 32 * 32 * 3];
        let frame = RgbImageView::new(&buf, 32, 32).unwrap();
        assert_eq!(tracker().track(&frame, None), Detection::NotFound);
    }

    #[test]
    fn off_band_color_is_not_found() {
        // Saturated red is far outside the green hue band.
        let buf = frame_with_square(32, 32, 8, 8, 10, [220, 20, 20]);
        let frame = RgbImageView::new(&buf, 32, 32).unwrap();
        assert_eq!(tracker().track(&frame, None), Detection::NotFound);
    }

    #[test]
    fn mass_at_floor_is_a_miss() {
        // A fully lit mask would have mass w*h*255; pick a floor equal to
        // the exact mass of a known blob to probe the strict comparison.
        let buf = frame_with_square(32, 32, 0, 0, 32, GREEN);
        let frame = RgbImageView::new(&buf, 32, 32).unwrap();

        let probe = tracker().track(&frame, None);
        let mass = match probe {
            Detection::Found(b) => b.mass,
            other => panic!("expected Found, got {other:?}"),
        };

        let at_floor = ColorTracker::new(TrackerParams {
            min_mass: mass,
            ..TrackerParams::default()
        });
        assert_eq!(at_floor.track(&frame, None), Detection::NotFound);
    }

    #[test]
    fn shutdown_short_circuits_even_with_target_visible() {
        let buf = frame_with_square(64, 48, 20, 10, 12, GREEN);
        let frame = RgbImageView::new(&buf, 64, 48).unwrap();

        let t = tracker();
        t.shutdown_handle().request();
        assert_eq!(t.track(&frame, None), Detection::Terminate);
    }

    #[test]
    fn reference_never_alters_detection() {
        let buf = frame_with_square(64, 48, 20, 10, 12, GREEN);
        let frame = RgbImageView::new(&buf, 64, 48).unwrap();

        let t = tracker();
        let plain = t.track(&frame, None);
        let with_ref = t.track(&frame, Some(123456.0));
        assert_eq!(plain, with_ref);
    }

    #[test]
    fn mass_classification_bands() {
        assert_eq!(MassClass::classify(7000.0, None, 0.25), MassClass::Uncalibrated);
        assert_eq!(
            MassClass::classify(7000.0, Some(10000.0), 0.25),
            MassClass::Low
        );
        assert_eq!(
            MassClass::classify(7500.0, Some(10000.0), 0.25),
            MassClass::InBand
        );
        assert_eq!(
            MassClass::classify(13100.0, Some(10000.0), 0.25),
            MassClass::High
        );
    }
}
