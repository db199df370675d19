// Ports - Interface definitions (contracts)

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::model::{KeyframeSample, VideoStreamSummary};
use crate::error::SegCutResult;

/// Half-open time window for a keyframe query, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub from: f64,
    pub to: f64,
}

impl TimeWindow {
    /// Window of `radius` seconds around `center`, clamped at 0
    pub fn around(center: f64, radius: f64) -> Self {
        Self {
            from: (center - radius).max(0.0),
            to: center + radius,
        }
    }
}

/// Port for the external media-processing collaborator.
///
/// The two capabilities the core consumes: keyframe timestamps in a time
/// window, and a stream's codec/bitrate/timebase summary. Implementations
/// spawn a probe subprocess per call and must honor the cancellation token
/// by killing the in-flight probe and returning
/// [`crate::error::SegCutError::Cancelled`].
#[async_trait]
pub trait MediaProbePort: Send + Sync {
    /// Probe keyframe samples within a time window of one video stream,
    /// ordered ascending by time
    async fn probe_keyframes(
        &self,
        file_path: &str,
        stream_index: usize,
        window: TimeWindow,
        cancel: &CancellationToken,
    ) -> SegCutResult<Vec<KeyframeSample>>;

    /// Probe one video stream's codec, bitrate, timebase and file size
    async fn probe_stream(
        &self,
        file_path: &str,
        stream_index: usize,
        cancel: &CancellationToken,
    ) -> SegCutResult<VideoStreamSummary>;
}
