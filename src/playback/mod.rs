//! Playback-mode state machine
//!
//! Called on every playback time-update tick. The engine is stateless: the
//! caller passes the active mode and the resolved bounds of the segment
//! being played, and gets back at most one action for this tick. All mode
//! and segment state lives with the caller, which keeps this a pure function
//! table that tests can drive deterministically.

use serde::{Deserialize, Serialize};

/// Special playback modes the UI can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Seek back to the segment start once the end is reached
    LoopSegment,
    /// Preview only the transition windows near the segment's start and end
    LoopSegmentStartEnd,
    /// Play the segment once, then signal the caller to leave the mode
    PlaySegmentOnce,
    /// On reaching the end, advance to the next selected segment (the caller
    /// decides which one by consulting selection order)
    LoopSelectedSegments,
}

/// Resolved bounds of the segment currently driving playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayingSegment {
    pub start: f64,
    pub end: f64,
}

impl PlayingSegment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Action the caller should perform this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackAction {
    /// Seek playback to the given time
    Seek { to: f64 },
    /// Seek and leave the special playback mode
    SeekAndExit { to: f64 },
    /// Advance to the next segment in selection order
    NextSegment,
}

/// Max preview time on each side of a transition point, in seconds
const MAX_PREVIEW_SIDE_SEC: f64 = 3.0;

/// Decide the next playback action, if any, for this tick
pub fn next_playback_action(
    mode: PlaybackMode,
    current_time: f64,
    segment: PlayingSegment,
) -> Option<PlaybackAction> {
    match mode {
        PlaybackMode::LoopSegment => {
            if current_time >= segment.end {
                return Some(PlaybackAction::Seek { to: segment.start });
            }
            None
        }
        PlaybackMode::LoopSegmentStartEnd => {
            // Two symmetric preview windows near start and end; skip the
            // middle of the segment instead of playing it through.
            let window = (MAX_PREVIEW_SIDE_SEC.min(segment.duration() / 3.0)) * 2.0;
            if current_time >= segment.end {
                return Some(PlaybackAction::Seek { to: segment.start });
            }
            let start_window_end = segment.start + window;
            let end_window_start = segment.end - window;
            if current_time >= start_window_end && current_time < end_window_start {
                return Some(PlaybackAction::Seek { to: end_window_start });
            }
            None
        }
        PlaybackMode::PlaySegmentOnce => {
            if current_time >= segment.end {
                return Some(PlaybackAction::SeekAndExit { to: segment.end });
            }
            None
        }
        PlaybackMode::LoopSelectedSegments => {
            if current_time >= segment.end {
                return Some(PlaybackAction::NextSegment);
            }
            None
        }
    }
}
