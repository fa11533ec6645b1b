use serde::{Deserialize, Serialize};

use crate::image::{Mask, RgbImageView};

/// Inclusive HSV band in OpenCV-style ranges: hue 0..=179, saturation and
/// value 0..=255. Hue thresholding against a saturated color is far more
/// robust to lighting changes than raw channel thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvBand {
    pub h_lo: u8,
    pub h_hi: u8,
    pub s_lo: u8,
    pub s_hi: u8,
    pub v_lo: u8,
    pub v_hi: u8,
}

impl HsvBand {
    /// Band tuned for the green practice ball.
    pub fn green() -> Self {
        Self {
            h_lo: 40,
            h_hi: 80,
            s_lo: 70,
            s_hi: 200,
            v_lo: 70,
            v_hi: 200,
        }
    }

    /// Band tuned for the orange marker cone.
    pub fn orange() -> Self {
        Self {
            h_lo: 6,
            h_hi: 24,
            s_lo: 168,
            s_hi: 255,
            v_lo: 175,
            v_hi: 255,
        }
    }

    #[inline]
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        h >= self.h_lo
            && h <= self.h_hi
            && s >= self.s_lo
            && s <= self.s_hi
            && v >= self.v_lo
            && v <= self.v_hi
    }
}

impl Default for HsvBand {
    fn default() -> Self {
        Self::green()
    }
}

/// Convert one 8-bit RGB triple to HSV with hue halved into 0..=179.
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let vmax = rf.max(gf).max(bf);
    let vmin = rf.min(gf).min(bf);
    let delta = vmax - vmin;

    let s = if vmax > 0.0 {
        (255.0 * delta / vmax).round()
    } else {
        0.0
    };

    let mut h = if delta > 0.0 {
        if vmax == rf {
            60.0 * (gf - bf) / delta
        } else if vmax == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        }
    } else {
        0.0
    };
    if h < 0.0 {
        h += 360.0;
    }

    // Halved hue wraps at 180 back to 0 (red straddles the origin).
    let h = (h / 2.0).round() as u16 % 180;
    (h as u8, s as u8, vmax as u8)
}

/// Threshold a frame against an HSV band, producing a 0/255 mask of the
/// pixels whose converted color falls inside the band (inclusive).
pub fn threshold_band(frame: &RgbImageView<'_>, band: &HsvBand) -> Mask {
    let mut mask = Mask::zeros(frame.width(), frame.height());
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let [r, g, b] = frame.pixel(x, y);
            let (h, s, v) = rgb_to_hsv(r, g, b);
            if band.contains(h, s, v) {
                mask.set(x, y, 255);
            }
        }
    }
    mask
}
