//! Typed model of the nested notification envelope.
//!
//! The transport delivers a batch-within-a-batch: an outer `Records` array of
//! envelopes, each carrying a JSON string that itself contains a `Records`
//! array of object-change events. The outer layer is deserialized up front;
//! the inner records stay as raw `serde_json::Value`s until per-item
//! extraction, so one malformed element cannot poison its siblings.

use serde::Deserialize;
use serde_json::Value;

use crate::error::EventError;

/// A full notification batch as delivered to one invocation.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct NotificationBatch {
    /// Transport-level envelopes, in delivery order
    #[serde(rename = "Records", default)]
    pub records: Vec<Envelope>,
}

/// One transport-level wrapper around a serialized event group.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Sns")]
    pub sns: SnsPayload,
}

/// The notification payload carried by an envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SnsPayload {
    /// Serialized `ItemEventGroup`, opaque until opened
    #[serde(rename = "Message")]
    pub message: String,
}

impl Envelope {
    /// Parse the inner message into an event group.
    ///
    /// A payload that is valid JSON but has no `Records` field yields an
    /// empty group (zero items, zero failures). A payload that cannot be
    /// parsed at all is an envelope-level failure.
    pub fn open(&self) -> Result<ItemEventGroup, EventError> {
        serde_json::from_str(&self.sns.message).map_err(EventError::Envelope)
    }
}

/// A batch of object-change events unwrapped from one envelope.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ItemEventGroup {
    /// Raw per-object records, extracted one at a time
    #[serde(rename = "Records", default)]
    pub records: Vec<Value>,
}

/// One object-storage change: the coordinates of a newly written object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEvent {
    pub bucket: String,
    pub key: String,
}

/// Wire shape of one raw record inside an event group.
#[derive(Debug, Deserialize)]
struct RawRecord {
    s3: RawS3,
}

#[derive(Debug, Deserialize)]
struct RawS3 {
    bucket: RawBucket,
    object: RawObject,
}

#[derive(Debug, Deserialize)]
struct RawBucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    key: String,
}

impl ItemEvent {
    /// Project one raw record into typed coordinates.
    ///
    /// Pure and side-effect-free. A missing or non-string bucket/key field
    /// is an extraction failure for this element only.
    pub fn from_record(record: &Value) -> Result<Self, EventError> {
        let raw: RawRecord =
            serde_json::from_value(record.clone()).map_err(EventError::MalformedRecord)?;
        if raw.s3.bucket.name.is_empty() {
            return Err(EventError::EmptyField { field: "bucket" });
        }
        if raw.s3.object.key.is_empty() {
            return Err(EventError::EmptyField { field: "key" });
        }
        Ok(Self {
            bucket: raw.s3.bucket.name,
            key: raw.s3.object.key,
        })
    }
}
