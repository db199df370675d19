//! Keyframe lookup with widening-window retry
//!
//! Most files carry keyframes every 1-10 seconds, so a narrow window around
//! the point of interest is cheap and almost always sufficient. When it
//! comes back empty (sparse keyframes, probe boundary) one retry with a wide
//! window bounds the worst-case probe cost. The two queries are strictly
//! sequential: the wide one is only issued when the narrow one found
//! nothing.
//!
//! Samples are not cached across searches; each search issues fresh window
//! queries so a swapped source file can never serve stale frames.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::model::KeyframeSample;
use crate::error::SegCutResult;
use crate::ports::{MediaProbePort, TimeWindow};

/// Narrow first-attempt window radius in seconds
pub const NARROW_WINDOW_SEC: f64 = 5.0;
/// Wide retry window radius in seconds (covers long-GOP encodes)
pub const WIDE_WINDOW_SEC: f64 = 30.0;

/// Which keyframe to pick relative to the requested time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframeSearchMode {
    /// Minimum absolute distance; equal distance prefers the earlier time
    Nearest,
    /// Closest keyframe strictly before the requested time
    Before,
    /// Closest keyframe at or after the requested time
    After,
}

/// Queries an external prober for keyframe timestamps around a point of
/// interest. Owns no state beyond the injected probe port; concurrent
/// searches for different boundaries are independent.
pub struct KeyframeIndex {
    probe: Arc<dyn MediaProbePort>,
}

impl KeyframeIndex {
    pub fn new(probe: Arc<dyn MediaProbePort>) -> Self {
        Self { probe }
    }

    /// Find a keyframe near `time`, or `Ok(None)` when none exists even in
    /// the widened window. Cancellation and probe failures propagate as
    /// errors, distinct from "no keyframe found".
    pub async fn find_keyframe(
        &self,
        file_path: &str,
        stream_index: usize,
        time: f64,
        mode: KeyframeSearchMode,
        cancel: &CancellationToken,
    ) -> SegCutResult<Option<f64>> {
        for radius in [NARROW_WINDOW_SEC, WIDE_WINDOW_SEC] {
            let window = TimeWindow::around(time, radius);
            let samples = self
                .probe
                .probe_keyframes(file_path, stream_index, window, cancel)
                .await?;

            if let Some(found) = select_keyframe(&samples, time, mode) {
                debug!(
                    time,
                    found, radius, "keyframe located within ±{}s window", radius
                );
                return Ok(Some(found));
            }
            debug!(time, radius, "no matching keyframe in ±{}s window", radius);
        }

        Ok(None)
    }
}

/// Pick the sample matching the search mode from one window's results.
/// Non-keyframe samples are skipped.
fn select_keyframe(samples: &[KeyframeSample], time: f64, mode: KeyframeSearchMode) -> Option<f64> {
    let keyframes = samples.iter().filter(|sample| sample.keyframe);

    match mode {
        KeyframeSearchMode::Nearest => {
            let mut best: Option<f64> = None;
            for sample in keyframes {
                let better = match best {
                    None => true,
                    Some(current) => {
                        let distance = (sample.time - time).abs();
                        let current_distance = (current - time).abs();
                        // Equal distance breaks toward the earlier time.
                        distance < current_distance
                            || (distance == current_distance && sample.time < current)
                    }
                };
                if better {
                    best = Some(sample.time);
                }
            }
            best
        }
        KeyframeSearchMode::Before => keyframes
            .filter(|sample| sample.time < time)
            .map(|sample| sample.time)
            .fold(None, |best, candidate| match best {
                Some(current) if current >= candidate => Some(current),
                _ => Some(candidate),
            }),
        KeyframeSearchMode::After => keyframes
            .filter(|sample| sample.time >= time)
            .map(|sample| sample.time)
            .fold(None, |best, candidate| match best {
                Some(current) if current <= candidate => Some(current),
                _ => Some(candidate),
            }),
    }
}
