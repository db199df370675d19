// Domain models - Core types and data structures

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SegCutError, SegCutResult};

/// Opaque segment identity, assigned once at creation and never reused.
///
/// All identity-preserving operations (reordering, selection, inversion
/// naming) key on this value, never on list position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(String);

impl SegmentId {
    /// Create a fresh, globally unique id
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Compose a stable derived id from two bounding ids.
    ///
    /// Used for gap segments produced by inversion: the gap between two
    /// originals keeps the same id across recomputations as long as its
    /// bounding originals keep theirs.
    pub fn compose(left: &SegmentId, right: &SegmentId) -> Self {
        Self(format!("{}~{}", left.0, right.0))
    }

    /// Sentinel id for the start of the timeline (bounds leading gaps)
    pub(crate) fn timeline_start() -> Self {
        Self("timeline-start".to_string())
    }

    /// Sentinel id for the end of the timeline (bounds trailing gaps)
    pub(crate) fn timeline_end() -> Self {
        Self("timeline-end".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One endpoint of a segment: either a concrete time or open-ended.
///
/// An open `start` extends to the start of the timeline; an open `end`
/// extends to the end of the timeline (making the segment a marker).
/// Resolution to concrete seconds happens in [`Segment::apparent_start`]
/// and [`Segment::apparent_end`] so every consumer computes the same value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    /// Concrete time in seconds
    Fixed(f64),
    /// Unset; resolved against timeline defaults
    Open,
}

/// Check whether a total duration is usable for bound resolution.
///
/// Guards against NaN/Infinity from media that has not finished loading.
pub fn is_valid_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

/// A user-defined time interval (or marker) on the media timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub start: Bound,
    pub end: Bound,
    pub name: String,
    pub tags: HashMap<String, String>,
}

impl Segment {
    /// Create a new segment with a fresh id
    pub fn new(start: Bound, end: Bound) -> Self {
        Self {
            id: SegmentId::new(),
            start,
            end,
            name: String::new(),
            tags: HashMap::new(),
        }
    }

    /// Create a new named segment with a fresh id
    pub fn named(start: Bound, end: Bound, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new(start, end)
        }
    }

    /// A segment with no end time is a marker: a zero-width point of
    /// interest rather than a true interval.
    pub fn is_marker(&self) -> bool {
        matches!(self.end, Bound::Open)
    }

    /// Resolved start: open starts fall back to the start of the timeline
    pub fn apparent_start(&self) -> f64 {
        match self.start {
            Bound::Fixed(seconds) => seconds,
            Bound::Open => 0.0,
        }
    }

    /// Resolved end: open ends fall back to the total duration when it is
    /// valid, else 0 (media not loaded yet).
    pub fn apparent_end(&self, total_duration: Option<f64>) -> f64 {
        match self.end {
            Bound::Fixed(seconds) => seconds,
            Bound::Open => total_duration.filter(|d| is_valid_duration(*d)).unwrap_or(0.0),
        }
    }

    /// Resolved duration, clamped at zero
    pub fn apparent_duration(&self, total_duration: Option<f64>) -> f64 {
        (self.apparent_end(total_duration) - self.apparent_start()).max(0.0)
    }
}

/// Timebase for timestamp calculations - rational number of seconds per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timebase {
    pub num: i32,
    pub den: i32,
}

impl Timebase {
    /// Create a new timebase
    pub fn new(num: i32, den: i32) -> SegCutResult<Self> {
        if den == 0 {
            return Err(SegCutError::invalid_input(
                "Timebase denominator cannot be zero",
            ));
        }
        Ok(Self { num, den })
    }

    /// Parse an ffprobe-style timebase string such as "1/90000"
    pub fn parse(raw: &str) -> SegCutResult<Self> {
        let (num, den) = raw.split_once('/').ok_or_else(|| {
            SegCutError::invalid_input(format!("Invalid timebase string: {}", raw))
        })?;
        let num = num
            .trim()
            .parse::<i32>()
            .map_err(|_| SegCutError::invalid_input(format!("Invalid timebase numerator: {}", raw)))?;
        let den = den
            .trim()
            .parse::<i32>()
            .map_err(|_| SegCutError::invalid_input(format!("Invalid timebase denominator: {}", raw)))?;
        Self::new(num, den)
    }

    /// Convert to floating point seconds per tick
    pub fn to_seconds(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

/// One probed sample in a query window, tagged keyframe/non-keyframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyframeSample {
    /// Timestamp in seconds
    pub time: f64,
    /// Whether the sample is a keyframe (safe lossless cut point)
    pub keyframe: bool,
}

/// Summary of a probed video stream, carrying the fields the smart-cut
/// planner derives re-encode parameters from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStreamSummary {
    pub codec_name: String,
    /// Declared stream bitrate in bits per second, when the container
    /// reports one
    pub bit_rate: Option<u64>,
    pub timebase: Option<Timebase>,
    pub duration_seconds: Option<f64>,
    pub file_size: u64,
}

/// Derived re-encode parameters for the bridging segment of a smart cut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReencodeParams {
    /// Encoder name (source codec mapped through the encoder equivalence
    /// table, e.g. av1 -> libsvtav1)
    pub codec: String,
    pub bitrate_bits_per_second: u64,
    pub timebase: Option<Timebase>,
}

/// Cut plan for one segment boundary: either "cut exactly here losslessly"
/// or "re-encode a short bridge up to the next keyframe".
///
/// Computed on demand at export time and never persisted; it depends on
/// live keyframe and stream probe data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutPlan {
    pub effective_cut_start: f64,
    pub needs_reencode: bool,
    pub reencode_params: Option<ReencodeParams>,
}

impl CutPlan {
    /// Plan for a cut that already sits on a keyframe
    pub fn lossless(cut_start: f64) -> Self {
        Self {
            effective_cut_start: cut_start,
            needs_reencode: false,
            reencode_params: None,
        }
    }

    /// Plan for a cut that needs a re-encoded bridge up to `keyframe_time`
    pub fn bridged(keyframe_time: f64, params: ReencodeParams) -> Self {
        Self {
            effective_cut_start: keyframe_time,
            needs_reencode: true,
            reencode_params: Some(params),
        }
    }
}

#[cfg(test)]
mod tests;
