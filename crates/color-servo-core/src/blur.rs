use crate::image::{Mask, RgbImage, RgbImageView};

// 5-tap binomial kernel, the discrete equivalent of a 5x5 Gaussian with
// auto sigma. Applied separably: rows, then columns.
const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];
const KERNEL_SUM: u32 = 16;

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// One separable pass over interleaved data. `stride` is the element count
/// between neighbors along the filtered axis, `lanes` the number of runs.
fn pass(
    src: &[u8],
    dst: &mut [u8],
    run_len: usize,
    lanes: usize,
    stride: usize,
    lane_stride: usize,
) {
    for lane in 0..lanes {
        let base = lane * lane_stride;
        for i in 0..run_len {
            let mut acc = 0u32;
            for (k, w) in KERNEL.iter().enumerate() {
                let j = clamp_index(i as isize + k as isize - 2, run_len);
                acc += w * src[base + j * stride] as u32;
            }
            dst[base + i * stride] = ((acc + KERNEL_SUM / 2) / KERNEL_SUM) as u8;
        }
    }
}

fn blur5_plane(data: &mut [u8], width: usize, height: usize, channels: usize) {
    let mut tmp = vec![0u8; data.len()];
    for c in 0..channels {
        // Horizontal: runs are rows, element stride along x is `channels`.
        pass(
            &data[c..],
            &mut tmp[c..],
            width,
            height,
            channels,
            width * channels,
        );
        // Vertical: runs are columns, element stride along y is a full row.
        pass(
            &tmp[c..],
            &mut data[c..],
            height,
            width,
            width * channels,
            channels,
        );
    }
}

/// 5x5 Gaussian blur of an RGB frame, suppressing per-pixel sensor noise
/// before color conversion.
pub fn blur5_rgb(frame: &RgbImageView<'_>) -> RgbImage {
    let mut data = frame.data().to_vec();
    blur5_plane(&mut data, frame.width(), frame.height(), 3);
    RgbImage {
        width: frame.width(),
        height: frame.height(),
        data,
    }
}

/// 5x5 Gaussian blur of a mask, grading the hard 0/255 threshold so that
/// stray single-pixel matches stop dominating the moments.
pub fn blur5_mask(mask: &Mask) -> Mask {
    let mut data = mask.data.clone();
    blur5_plane(&mut data, mask.width, mask.height, 1);
    Mask {
        width: mask.width,
        height: mask.height,
        data,
    }
}
