/// Errors raised when a raw frame buffer does not match its declared shape.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormatError {
    #[error("invalid frame dimensions (width={width}, height={height})")]
    BadDimensions { width: usize, height: usize },

    #[error("invalid frame buffer length (width={width}, height={height}, expected {expected} bytes, got {got})")]
    BadLength {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
}

/// Borrowed view over one interleaved 8-bit RGB frame.
///
/// Data is row-major with 3 samples per pixel, `len = width * height * 3`.
/// The view borrows the caller's buffer for the duration of one call and is
/// never persisted by the crates built on top of it.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl<'a> RgbImageView<'a> {
    /// Wrap a raw buffer, validating its length against the declared shape.
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self, FrameFormatError> {
        if width == 0 || height == 0 {
            return Err(FrameFormatError::BadDimensions { width, height });
        }
        let expected = width * height * 3;
        if data.len() != expected {
            return Err(FrameFormatError::BadLength {
                width,
                height,
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// RGB triple at (x, y). Panics outside the frame; callers iterate
    /// within the declared bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Owned interleaved 8-bit RGB image, produced by filtering stages.
#[derive(Clone, Debug)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbImage {
    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

/// Owned single-channel mask, `len = width * height`.
///
/// Thresholding writes 0/255; smoothing grades it to the full 0..=255 range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Mask {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rejects_short_buffer() {
        let buf = vec![0u8; 10];
        let err = RgbImageView::new(&buf, 4, 4).unwrap_err();
        assert_eq!(
            err,
            FrameFormatError::BadLength {
                width: 4,
                height: 4,
                expected: 48,
                got: 10
            }
        );
    }

    #[test]
    fn view_rejects_zero_dimensions() {
        let buf = vec![];
        assert!(matches!(
            RgbImageView::new(&buf, 0, 4),
            Err(FrameFormatError::BadDimensions { .. })
        ));
    }

    #[test]
    fn view_indexes_row_major() {
        let mut buf = vec![0u8; 2 * 2 * 3];
        buf[(1 * 2 + 1) * 3] = 7; // r of (1,1)
        let view = RgbImageView::new(&buf, 2, 2).unwrap();
        assert_eq!(view.pixel(1, 1), [7, 0, 0]);
        assert_eq!(view.pixel(0, 0), [0, 0, 0]);
    }
}
