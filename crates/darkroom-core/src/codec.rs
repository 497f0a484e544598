//! Image decoding and JPEG re-encoding over in-memory byte buffers.

use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

use crate::error::ProcessError;

/// Decode raw object bytes into a pixel buffer.
///
/// The format is guessed from the content, not the key's extension, so a PNG
/// uploaded with a `.jpg` suffix still decodes. The key is carried only for
/// error attribution.
pub fn decode(bytes: &[u8], key: &str) -> Result<DynamicImage, ProcessError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ProcessError::Decode {
            key: key.to_string(),
            message: format!("Cannot detect image format: {}", e),
        })?;
    reader.decode().map_err(|e| ProcessError::Decode {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Encode a pixel buffer as JPEG bytes.
pub fn encode_jpeg(image: &DynamicImage, key: &str) -> Result<Vec<u8>, ProcessError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| ProcessError::Encode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
    Ok(buffer.into_inner())
}
