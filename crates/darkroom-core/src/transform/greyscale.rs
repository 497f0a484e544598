//! Greyscale strategy: 8-bit luminance conversion.

use crate::error::ProcessError;

use super::{basename, Destination, SkipReason, SourceImage, Transform, TransformOutput};

/// First path segment of every artifact this strategy writes.
const OUTPUT_PREFIX: &str = "greyscale";

/// Converts the source to single-channel luminance and writes it back under
/// `greyscale/` in the source bucket.
pub struct GreyscaleTransform;

impl Transform for GreyscaleTransform {
    fn name(&self) -> &'static str {
        "greyscale"
    }

    fn guard(&self, _bucket: &str, key: &str) -> Option<SkipReason> {
        // Compare the first path segment only; "uploads/greyscale.jpg" is
        // a legitimate input.
        if key.split('/').next() == Some(OUTPUT_PREFIX) {
            Some(SkipReason::SelfProduced)
        } else {
            None
        }
    }

    fn apply(&self, source: &SourceImage) -> Result<TransformOutput, ProcessError> {
        Ok(TransformOutput::Image(source.image.grayscale()))
    }

    fn destination(&self, bucket: &str, key: &str) -> Destination {
        Destination {
            bucket: bucket.to_string(),
            key: format!("{}/{}", OUTPUT_PREFIX, basename(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

    #[test]
    fn test_guard_matches_first_segment_only() {
        let t = GreyscaleTransform;
        assert_eq!(
            t.guard("photos", "greyscale/cat.jpg"),
            Some(SkipReason::SelfProduced)
        );
        assert_eq!(t.guard("photos", "greyscale"), Some(SkipReason::SelfProduced));

        assert_eq!(t.guard("photos", "uploads/cat.jpg"), None);
        // "greyscale" elsewhere in the key is not the output prefix
        assert_eq!(t.guard("photos", "uploads/greyscale.jpg"), None);
        assert_eq!(t.guard("photos", "uploads/greyscale/cat.jpg"), None);
    }

    #[test]
    fn test_destination_keeps_bucket_and_basename() {
        let dest = GreyscaleTransform.destination("photos", "uploads/deep/dog.png");
        assert_eq!(dest.bucket, "photos");
        assert_eq!(dest.key, "greyscale/dog.png");
    }

    #[test]
    fn test_apply_flattens_channels() {
        let mut img = RgbImage::new(4, 4);
        img.put_pixel(0, 0, Rgb([250, 10, 60]));
        let source = SourceImage {
            key: "uploads/dog.png".to_string(),
            bytes: Vec::new(),
            image: DynamicImage::ImageRgb8(img),
        };

        let output = GreyscaleTransform.apply(&source).unwrap();
        let TransformOutput::Image(grey) = output else {
            panic!("greyscale output should be a pixel buffer");
        };
        assert_eq!(grey.dimensions(), (4, 4));
        // single-channel semantics: all RGB channels equal after conversion
        let px = grey.to_rgb8().get_pixel(0, 0).0;
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }
}
