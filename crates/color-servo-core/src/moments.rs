use nalgebra::Point2;

use crate::image::Mask;

/// Raw moments of a mask: zeroth (total mass) and first (mass-weighted
/// coordinate sums). Enough to place a centroid; higher orders are not
/// needed here.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Mass-weighted average coordinate, or `None` for an empty mask.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.m00 > 0.0 {
            Some(Point2::new(self.m10 / self.m00, self.m01 / self.m00))
        } else {
            None
        }
    }
}

/// Accumulate the mask's moments. Mass is the plain sum of mask bytes, so a
/// smoothed mask contributes its graded values, not a pixel count.
pub fn mask_moments(mask: &Mask) -> Moments {
    let mut m = Moments::default();
    for y in 0..mask.height {
        let row = &mask.data[y * mask.width..(y + 1) * mask.width];
        for (x, &v) in row.iter().enumerate() {
            let v = v as f64;
            m.m00 += v;
            m.m10 += v * x as f64;
            m.m01 += v * y as f64;
        }
    }
    m
}
