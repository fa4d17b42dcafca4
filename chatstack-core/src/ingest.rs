//! Input normalization
//!
//! Converts raw chat records (millisecond timestamps on an arbitrary epoch)
//! into `ChatMessage`s on the overlay clock, which starts at the earliest
//! message.

use crate::{ChatMessage, Error, Result};

/// Spacing used when no record carries a usable timestamp
const FALLBACK_CADENCE_SECS: f64 = 1.0;

/// A chat record as delivered by the capture side
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawRecord {
    /// Timestamp in milliseconds, `None` when missing or malformed
    pub timestamp_ms: Option<i64>,
    pub name: String,
    pub body: String,
}

impl RawRecord {
    /// Creates a new raw record, trimming name and body
    pub fn new(timestamp_ms: Option<i64>, name: &str, body: &str) -> Self {
        Self {
            timestamp_ms,
            name: name.trim().to_string(),
            body: body.trim().to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        self.name.is_empty() && self.body.is_empty()
    }
}

/// Normalizes raw records into time-sorted chat messages.
///
/// Blank records are dropped. When at least one record has a timestamp,
/// records without one are dropped and the rest are placed relative to the
/// earliest timestamp. Otherwise messages are spaced one second apart. The
/// `offset_secs` shift is applied afterwards and negative results clamp to 0.
/// A non-finite offset is rejected.
pub fn normalize(records: Vec<RawRecord>, offset_secs: f64) -> Result<Vec<ChatMessage>> {
    if !offset_secs.is_finite() {
        return Err(Error::Configuration(format!(
            "time offset must be a finite number of seconds, got {}",
            offset_secs
        )));
    }

    let mut records: Vec<RawRecord> = records.into_iter().filter(|r| !r.is_blank()).collect();

    let timed: Vec<(f64, RawRecord)> = if records.iter().any(|r| r.timestamp_ms.is_some()) {
        let before = records.len();
        records.retain(|r| r.timestamp_ms.is_some());
        if records.len() < before {
            tracing::debug!(skipped = before - records.len(), "dropped records without timestamps");
        }

        records.sort_by_key(|r| r.timestamp_ms);
        let base = records.first().and_then(|r| r.timestamp_ms).unwrap_or(0);
        records
            .into_iter()
            .map(|r| {
                let ms = r.timestamp_ms.unwrap_or(base);
                ((ms - base) as f64 / 1000.0, r)
            })
            .collect()
    } else {
        if !records.is_empty() {
            tracing::warn!(
                count = records.len(),
                "no usable timestamps, spacing messages {FALLBACK_CADENCE_SECS}s apart"
            );
        }
        records
            .into_iter()
            .enumerate()
            .map(|(i, r)| (i as f64 * FALLBACK_CADENCE_SECS, r))
            .collect()
    };

    Ok(timed
        .into_iter()
        .enumerate()
        .map(|(id, (secs, r))| {
            let time = (secs + offset_secs).max(0.0);
            ChatMessage::new(id as u32, time, r.name, r.body)
        })
        .collect())
}
