//! Timeline data structures produced by the simulator

use crate::{ChatMessage, SimulationConfig};

/// One contiguous interval during which a message sits in a single slot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (always greater than `start`)
    pub end: f64,
    /// Slot index, 0 is the bottom of the stack
    pub slot: usize,
    /// Slot this segment slides in from, `None` for a fresh arrival
    pub moved_from: Option<usize>,
    /// Last segment of its message, eligible for a fade-out
    #[cfg_attr(feature = "serde", serde(rename = "final"))]
    pub is_final: bool,
}

impl Segment {
    /// Creates a new, non-final segment
    pub fn new(start: f64, end: f64, slot: usize, moved_from: Option<usize>) -> Self {
        Self {
            start,
            end,
            slot,
            moved_from,
            is_final: false,
        }
    }

    /// Checks if this segment is visible at the given time
    pub fn is_active(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Returns the duration of this segment in seconds
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// A message together with every segment it occupies
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageTrack {
    pub message: ChatMessage,
    /// Segments in chronological order
    pub segments: Vec<Segment>,
}

impl MessageTrack {
    pub fn new(message: ChatMessage) -> Self {
        Self {
            message,
            segments: Vec::new(),
        }
    }

    /// Returns true if the message was never visible
    pub fn is_hidden(&self) -> bool {
        self.segments.is_empty()
    }

    /// Gets the segment covering the given time, if any
    pub fn segment_at(&self, time: f64) -> Option<&Segment> {
        self.segments.iter().find(|s| s.is_active(time))
    }

    /// Time the message was last visible
    pub fn visible_until(&self) -> Option<f64> {
        self.segments.last().map(|s| s.end)
    }
}

/// Complete simulation result
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    /// Configuration the timeline was simulated with
    pub config: SimulationConfig,
    /// One track per input message, in input order
    pub tracks: Vec<MessageTrack>,
}

impl Timeline {
    /// Creates a new timeline
    pub fn new(config: SimulationConfig, tracks: Vec<MessageTrack>) -> Self {
        Self { config, tracks }
    }

    /// Total number of segments across all tracks
    pub fn segment_count(&self) -> usize {
        self.tracks.iter().map(|t| t.segments.len()).sum()
    }

    /// Iterates over every segment with its owning track, in output order
    pub fn segments(&self) -> impl Iterator<Item = (&MessageTrack, &Segment)> {
        self.tracks
            .iter()
            .flat_map(|track| track.segments.iter().map(move |seg| (track, seg)))
    }

    /// Gets all tracks visible at a given time, bottom slot first
    pub fn active_at(&self, time: f64) -> Vec<(&MessageTrack, &Segment)> {
        let mut visible: Vec<_> = self
            .tracks
            .iter()
            .filter_map(|track| track.segment_at(time).map(|seg| (track, seg)))
            .collect();

        visible.sort_by_key(|(_, seg)| seg.slot);
        visible
    }

    /// End of the last visible segment, 0 for an empty timeline
    pub fn duration(&self) -> f64 {
        self.tracks
            .iter()
            .filter_map(MessageTrack::visible_until)
            .fold(0.0, f64::max)
    }

    /// Serializes the timeline as pretty-printed JSON
    #[cfg(feature = "serde")]
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
