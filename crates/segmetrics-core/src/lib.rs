//! Core types for segmentation quality metrics.
//!
//! This crate is intentionally small. It owns the single-channel pixel
//! buffer types, the 256-bin intensity histogram and Otsu's global
//! threshold selection. It knows nothing about masks, metrics or scoring.

mod histogram;
mod image;
mod logger;

pub use histogram::{otsu_threshold, Histogram, HISTOGRAM_BINS};
pub use image::{BufferError, PixelBuffer, PixelBufferView};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, DEFAULT_TRACING_FILTER};

pub use logger::init_with_level;
