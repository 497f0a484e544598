//! Pluggable transform strategies.
//!
//! The engine is identical for every artifact it derives; only three
//! capabilities vary per strategy:
//! - **guard**: the loop-prevention predicate, evaluated before any download
//! - **apply**: the pure transform over the downloaded source
//! - **destination**: where the derived artifact is written
//!
//! - **exif**: embedded metadata → JSON document
//! - **greyscale**: 8-bit luminance conversion
//! - **resize**: aspect-preserving thumbnail

pub mod exif;
pub mod greyscale;
pub mod resize;

use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::error::ProcessError;

pub use self::exif::ExifTransform;
pub use self::greyscale::GreyscaleTransform;
pub use self::resize::ResizeTransform;

/// Why an item was skipped rather than processed. Skips are neutral:
/// they count toward neither `processed` nor `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The key's extension is not one this strategy handles
    NotAnImage,
    /// The key points at this strategy's own output
    SelfProduced,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAnImage => write!(f, "not an image"),
            SkipReason::SelfProduced => write!(f, "already processed"),
        }
    }
}

/// A downloaded source artifact, decoded once by the engine.
///
/// Pixel strategies work from `image`; the EXIF strategy reads container
/// metadata straight from `bytes`, which a decoded buffer no longer carries.
pub struct SourceImage {
    /// Originating object key, for error attribution
    pub key: String,
    pub bytes: Vec<u8>,
    pub image: DynamicImage,
}

/// What a strategy produced for upload.
pub enum TransformOutput {
    /// A pixel buffer; the engine re-encodes it as JPEG before upload
    Image(DynamicImage),
    /// Pre-serialized bytes with an explicit content type
    Raw {
        bytes: Vec<u8>,
        content_type: &'static str,
    },
}

/// Upload coordinates for a derived artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub bucket: String,
    pub key: String,
}

/// The capability contract every strategy implements.
pub trait Transform: Send + Sync {
    /// Strategy name, for logging.
    fn name(&self) -> &'static str;

    /// Loop-prevention predicate. Pure over `(bucket, key)`, no I/O;
    /// `Some(reason)` means skip without downloading.
    fn guard(&self, bucket: &str, key: &str) -> Option<SkipReason>;

    /// Derive the output artifact from the source. Pure.
    fn apply(&self, source: &SourceImage) -> Result<TransformOutput, ProcessError>;

    /// Where the derived artifact goes.
    fn destination(&self, bucket: &str, key: &str) -> Destination;
}

/// The three shipped strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Exif,
    Greyscale,
    Resize,
}

impl TransformKind {
    /// Construct the strategy, pulling any deploy-time settings from config.
    pub fn build(&self, config: &Config) -> Arc<dyn Transform> {
        match self {
            TransformKind::Exif => Arc::new(ExifTransform::new(config.exif.clone())),
            TransformKind::Greyscale => Arc::new(GreyscaleTransform),
            TransformKind::Resize => Arc::new(ResizeTransform),
        }
    }
}

/// Final `/`-segment of a key: `uploads/cat.jpg` → `cat.jpg`.
pub(crate) fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Basename with its final extension removed: `uploads/cat.jpg` → `cat`.
pub(crate) fn stem(key: &str) -> &str {
    let name = basename(key);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Lowercased extension, if any: `uploads/CAT.JPG` → `jpg`.
pub(crate) fn extension(key: &str) -> Option<String> {
    let name = basename(key);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(name[idx + 1..].to_ascii_lowercase()),
    }
}
