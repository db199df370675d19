//! SegCut - Timeline Segment Engine and Smart-Cut Planner
//!
//! The core of a video cutting tool that delegates decoding, encoding and
//! muxing to an external media engine. SegCut owns the user's cut segments
//! and keeps them consistent (overlap detection, gap derivation, stable
//! identity across edits), drives the playback-mode state machine, and plans
//! per-boundary smart cuts: lossless at an exact keyframe when possible,
//! otherwise a short re-encoded bridge up to the next keyframe found by
//! widening-window probes.
//!
//! Media probing is consumed through the [`ports::MediaProbePort`] trait;
//! [`adapters::FfprobeAdapter`] implements it over an `ffprobe` subprocess,
//! and tests inject deterministic fakes.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod keyframes;
pub mod planner;
pub mod playback;
pub mod ports;
pub mod store;
pub mod timeline;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{
    Bound, CutPlan, KeyframeSample, ReencodeParams, Segment, SegmentId, Timebase,
    VideoStreamSummary,
};
pub use adapters::FfprobeAdapter;
pub use error::{SegCutError, SegCutResult};
pub use keyframes::{KeyframeIndex, KeyframeSearchMode};
pub use planner::SmartCutPlanner;
pub use ports::{MediaProbePort, TimeWindow};
pub use playback::{next_playback_action, PlaybackAction, PlaybackMode, PlayingSegment};
pub use store::SegmentStore;
pub use timeline::DerivedViews;
