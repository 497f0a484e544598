//! Resize strategy: aspect-preserving thumbnail generation.

use image::imageops::FilterType;

use crate::error::ProcessError;

use super::{basename, Destination, SkipReason, SourceImage, Transform, TransformOutput};

/// Prefix (with separator) of every artifact this strategy writes.
const OUTPUT_PREFIX: &str = "thumbnails/";

/// Longest edge of a generated thumbnail, in pixels.
const MAX_EDGE: u32 = 200;

/// Downscales the source so neither dimension exceeds [`MAX_EDGE`] and
/// writes it back under `thumbnails/` in the source bucket.
pub struct ResizeTransform;

impl Transform for ResizeTransform {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn guard(&self, _bucket: &str, key: &str) -> Option<SkipReason> {
        if key.starts_with(OUTPUT_PREFIX) {
            Some(SkipReason::SelfProduced)
        } else {
            None
        }
    }

    fn apply(&self, source: &SourceImage) -> Result<TransformOutput, ProcessError> {
        let image = &source.image;
        // Never upscale: sources already inside the bounding box pass through.
        let thumbnail = if image.width() <= MAX_EDGE && image.height() <= MAX_EDGE {
            image.clone()
        } else {
            image.resize(MAX_EDGE, MAX_EDGE, FilterType::Lanczos3)
        };
        Ok(TransformOutput::Image(thumbnail))
    }

    fn destination(&self, bucket: &str, key: &str) -> Destination {
        Destination {
            bucket: bucket.to_string(),
            key: format!("{}{}", OUTPUT_PREFIX, basename(key)),
        }
    }
}
