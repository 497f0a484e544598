//! Core result types for the Darkroom batch engine.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Terminal status of one batch invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every non-skipped item processed cleanly
    Success,
    /// At least one item failed. Deliberately the same status whether one
    /// item of a thousand failed or all of them did — there is no distinct
    /// "total failure" signal.
    PartialFailure,
}

/// Aggregate tally returned once per invocation.
///
/// Guard skips are excluded from both counters; failure detail (which items,
/// why) is available only in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchResult {
    /// Items transformed and uploaded
    pub processed: u64,
    /// Envelope-level and item-level failures combined
    pub failed: u64,
}

impl BatchResult {
    pub fn new(processed: u64, failed: u64) -> Self {
        Self { processed, failed }
    }

    /// Status is derived, never stored: `PartialFailure` iff `failed > 0`.
    pub fn status(&self) -> BatchStatus {
        if self.failed > 0 {
            BatchStatus::PartialFailure
        } else {
            BatchStatus::Success
        }
    }

    /// HTTP-style status code: 200 for success, 207 (multi-status) otherwise.
    pub fn status_code(&self) -> u16 {
        match self.status() {
            BatchStatus::Success => 200,
            BatchStatus::PartialFailure => 207,
        }
    }
}

impl Serialize for BatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BatchResult", 3)?;
        state.serialize_field("statusCode", &self.status_code())?;
        state.serialize_field("processed", &self.processed)?;
        state.serialize_field("failed", &self.failed)?;
        state.end()
    }
}
