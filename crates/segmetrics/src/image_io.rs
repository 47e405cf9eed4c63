//! Interop with `image::GrayImage` (feature `image`).

use crate::{MetricsEngine, MetricsError, SegmentationMetrics};
use segmetrics_core::{BufferError, PixelBuffer, PixelBufferView};

/// Borrow an `image::GrayImage` as a pixel buffer view.
pub fn view_from_image(img: &::image::GrayImage) -> Result<PixelBufferView<'_>, BufferError> {
    PixelBufferView::new(img.width() as usize, img.height() as usize, img.as_raw())
}

/// Take ownership of an `image::GrayImage`'s pixels without copying.
pub fn buffer_from_image(img: ::image::GrayImage) -> Result<PixelBuffer, BufferError> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    PixelBuffer::new(width, height, img.into_raw())
}

/// Copy a pixel buffer into an `image::GrayImage`.
pub fn image_from_buffer(buf: &PixelBuffer) -> Result<::image::GrayImage, BufferError> {
    let invalid = BufferError::InvalidDimensions {
        width: buf.width(),
        height: buf.height(),
    };
    let width = u32::try_from(buf.width()).map_err(|_| invalid)?;
    let height = u32::try_from(buf.height()).map_err(|_| invalid)?;
    ::image::GrayImage::from_raw(width, height, buf.data().to_vec()).ok_or(invalid)
}

/// Run `engine` directly on `image::GrayImage` inputs.
pub fn compute_images(
    engine: &MetricsEngine,
    original: &::image::GrayImage,
    candidate: &::image::GrayImage,
    ground_truth: Option<&::image::GrayImage>,
) -> Result<SegmentationMetrics, MetricsError> {
    let original = view_from_image(original)?;
    let candidate = view_from_image(candidate)?;
    let ground_truth = ground_truth.map(view_from_image).transpose()?;
    engine.compute(&original, &candidate, ground_truth.as_ref())
}
