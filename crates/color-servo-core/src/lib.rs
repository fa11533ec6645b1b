//! Core types and utilities for color-blob visual servoing.
//!
//! This crate is intentionally small and purely pixel-level. It does *not*
//! know about target tracking or flight control; it only provides the image
//! views, color conversion, filtering and moment math those layers build on.

mod blur;
mod hsv;
mod image;
mod logger;
mod moments;
mod shutdown;

pub use blur::{blur5_mask, blur5_rgb};
pub use hsv::{rgb_to_hsv, threshold_band, HsvBand};
pub use image::{FrameFormatError, Mask, RgbImage, RgbImageView};
pub use moments::{mask_moments, Moments};
pub use shutdown::ShutdownHandle;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
