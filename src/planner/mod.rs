//! Smart-cut planning per segment boundary
//!
//! For each segment's desired cut start the planner decides whether the cut
//! already sits on a keyframe (lossless fast path) or whether the stretch up
//! to the next keyframe must be re-encoded as a short bridge. Plans are
//! advisory: a caller may always ignore `needs_reencode` and force a full
//! re-encode, so a planning failure only removes the lossless option for one
//! boundary.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::model::{is_valid_duration, CutPlan, ReencodeParams, VideoStreamSummary};
use crate::error::{SegCutError, SegCutResult};
use crate::keyframes::{KeyframeIndex, KeyframeSearchMode, WIDE_WINDOW_SEC};
use crate::ports::MediaProbePort;
use crate::utils::time::format_hms;

/// Safety factor applied to the source bitrate for the bridge re-encode, to
/// avoid visible quality loss across the bridge boundary
pub const BITRATE_SAFETY_FACTOR: f64 = 1.2;

/// Map a source codec name to the encoder that produces it.
/// Decoder and encoder names differ for some codecs.
fn encoder_for_codec(codec_name: &str) -> String {
    match codec_name {
        "av1" => "libsvtav1".to_string(),
        "vp9" => "libvpx-vp9".to_string(),
        "vp8" => "libvpx".to_string(),
        other => other.to_string(),
    }
}

/// Plans lossless-or-bridged cuts against one media file.
///
/// Owns no state beyond the injected probe port; concurrent plans for
/// different boundaries are independent.
pub struct SmartCutPlanner {
    probe: Arc<dyn MediaProbePort>,
    keyframes: KeyframeIndex,
}

impl SmartCutPlanner {
    pub fn new(probe: Arc<dyn MediaProbePort>) -> Self {
        Self {
            keyframes: KeyframeIndex::new(Arc::clone(&probe)),
            probe,
        }
    }

    /// Produce a cut plan for `desired_cut_start`.
    ///
    /// `video_stream_indexes` must name exactly one video stream; with more
    /// than one it is ambiguous which stream governs keyframe alignment.
    /// Fails with `NoKeyframeFound` when even the widened search finds no
    /// keyframe at or after the cut point.
    pub async fn plan_smart_cut(
        &self,
        file_path: &str,
        desired_cut_start: f64,
        video_stream_indexes: &[usize],
        cancel: &CancellationToken,
    ) -> SegCutResult<CutPlan> {
        let stream_index = match video_stream_indexes {
            [only] => *only,
            [] => {
                return Err(SegCutError::invalid_input(
                    "Smart cut requires a video stream",
                ))
            }
            _ => {
                return Err(SegCutError::invalid_input(format!(
                    "Smart cut supports exactly one video stream, got {}",
                    video_stream_indexes.len()
                )))
            }
        };

        debug!(
            file = file_path,
            stream = stream_index,
            "planning smart cut at {}",
            format_hms(desired_cut_start)
        );

        let next_keyframe = self
            .keyframes
            .find_keyframe(
                file_path,
                stream_index,
                desired_cut_start,
                KeyframeSearchMode::After,
                cancel,
            )
            .await?
            .ok_or(SegCutError::NoKeyframeFound {
                time: desired_cut_start,
                window: WIDE_WINDOW_SEC,
            })?;

        // Exact timestamp match: the cut is already lossless.
        if next_keyframe == desired_cut_start {
            info!(
                "cut at {} lands on a keyframe, no bridge needed",
                format_hms(desired_cut_start)
            );
            return Ok(CutPlan::lossless(desired_cut_start));
        }

        let stream = self
            .probe
            .probe_stream(file_path, stream_index, cancel)
            .await?;
        let bitrate = derive_bridge_bitrate(&stream)?;
        let params = ReencodeParams {
            codec: encoder_for_codec(&stream.codec_name),
            bitrate_bits_per_second: bitrate,
            timebase: stream.timebase.clone(),
        };

        info!(
            "bridging {} -> {} with {} at {} b/s",
            format_hms(desired_cut_start),
            format_hms(next_keyframe),
            params.codec,
            params.bitrate_bits_per_second
        );
        Ok(CutPlan::bridged(next_keyframe, params))
    }
}

/// Bridge bitrate: the declared stream bitrate scaled by the safety factor,
/// falling back to a whole-file estimate (`file_size * 8 / duration`) when
/// the stream declares none.
fn derive_bridge_bitrate(stream: &VideoStreamSummary) -> SegCutResult<u64> {
    let base = match stream.bit_rate {
        Some(declared) if declared > 0 => declared as f64,
        _ => {
            let duration = stream
                .duration_seconds
                .filter(|d| is_valid_duration(*d))
                .ok_or_else(|| {
                    SegCutError::invalid_input(
                        "Cannot derive bridge bitrate: no declared bitrate and unknown duration",
                    )
                })?;
            (stream.file_size * 8) as f64 / duration
        }
    };
    Ok((base * BITRATE_SAFETY_FACTOR).round() as u64)
}

#[cfg(test)]
mod tests;
