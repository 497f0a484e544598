//! EXIF extraction strategy: embedded metadata tags → JSON document.

use exif::{In, Reader, Tag, Value};
use serde_json::{Map, Value as Json};
use std::io::Cursor;

use crate::config::ExifConfig;
use crate::error::ProcessError;

use super::{extension, stem, Destination, SkipReason, SourceImage, Transform, TransformOutput};

/// Extensions this strategy will read metadata from.
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "tif", "tiff"];

/// Extracts all primary-IFD EXIF tags and uploads them as a JSON object.
///
/// Unlike the pixel strategies, the guard here is an extension allow-list and
/// not an output-prefix check: `.json` artifacts never match the allow-list,
/// which is what keeps this strategy off its own output.
pub struct ExifTransform {
    config: ExifConfig,
}

impl ExifTransform {
    pub fn new(config: ExifConfig) -> Self {
        Self { config }
    }
}

impl Transform for ExifTransform {
    fn name(&self) -> &'static str {
        "exif"
    }

    fn guard(&self, _bucket: &str, key: &str) -> Option<SkipReason> {
        match extension(key) {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => None,
            _ => Some(SkipReason::NotAnImage),
        }
    }

    fn apply(&self, source: &SourceImage) -> Result<TransformOutput, ProcessError> {
        // No readable EXIF container is not an error: the artifact is just
        // an empty object.
        let tags = match Reader::new().read_from_container(&mut Cursor::new(&source.bytes)) {
            Ok(exif) => {
                let mut tags = Map::new();
                for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
                    tags.insert(tag_name(field.tag), field_json(field));
                }
                tags
            }
            Err(_) => {
                tracing::debug!("No EXIF data found in {}", source.key);
                Map::new()
            }
        };

        let bytes = serde_json::to_string_pretty(&Json::Object(tags))
            .map_err(|e| ProcessError::Transform {
                key: source.key.clone(),
                message: e.to_string(),
            })?
            .into_bytes();

        Ok(TransformOutput::Raw {
            bytes,
            content_type: "application/json",
        })
    }

    fn destination(&self, bucket: &str, key: &str) -> Destination {
        let bucket = self
            .config
            .target_bucket
            .clone()
            .unwrap_or_else(|| bucket.to_string());
        Destination {
            bucket,
            key: format!("{}{}.json", self.config.normalized_prefix(), stem(key)),
        }
    }
}

/// Human-readable tag name, falling back to the raw numeric id for tags
/// the name table doesn't know.
fn tag_name(tag: Tag) -> String {
    if tag.description().is_some() {
        tag.to_string()
    } else {
        tag.number().to_string()
    }
}

/// Project one EXIF field value into JSON.
///
/// Byte payloads become UTF-8 strings with undecodable bytes dropped,
/// single integral values become numbers, everything else is stringified
/// through the field's display form.
fn field_json(field: &exif::Field) -> Json {
    match &field.value {
        Value::Byte(bytes) => Json::String(utf8_ignoring(bytes)),
        Value::Undefined(bytes, _) => Json::String(utf8_ignoring(bytes)),
        Value::Ascii(lines) => Json::String(
            lines
                .iter()
                .map(|line| utf8_ignoring(line))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Value::Short(v) if v.len() == 1 => Json::from(v[0]),
        Value::Long(v) if v.len() == 1 => Json::from(v[0]),
        Value::SShort(v) if v.len() == 1 => Json::from(v[0]),
        Value::SLong(v) if v.len() == 1 => Json::from(v[0]),
        _ => Json::String(field.display_value().to_string()),
    }
}

/// Decode bytes as UTF-8, dropping undecodable sequences.
fn utf8_ignoring(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect()
}
