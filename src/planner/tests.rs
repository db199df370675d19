// Unit tests for the smart-cut planner, driven by a deterministic fake probe

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::domain::model::{KeyframeSample, Timebase};
use crate::ports::{MediaProbePort, TimeWindow};

struct FakeProbe {
    keyframe_times: Vec<f64>,
    stream: VideoStreamSummary,
}

impl FakeProbe {
    fn new(keyframe_times: Vec<f64>, stream: VideoStreamSummary) -> Arc<Self> {
        Arc::new(Self {
            keyframe_times,
            stream,
        })
    }
}

#[async_trait]
impl MediaProbePort for FakeProbe {
    async fn probe_keyframes(
        &self,
        _file_path: &str,
        _stream_index: usize,
        window: TimeWindow,
        cancel: &CancellationToken,
    ) -> SegCutResult<Vec<KeyframeSample>> {
        if cancel.is_cancelled() {
            return Err(SegCutError::Cancelled);
        }
        Ok(self
            .keyframe_times
            .iter()
            .filter(|time| **time >= window.from && **time <= window.to)
            .map(|time| KeyframeSample {
                time: *time,
                keyframe: true,
            })
            .collect())
    }

    async fn probe_stream(
        &self,
        _file_path: &str,
        _stream_index: usize,
        cancel: &CancellationToken,
    ) -> SegCutResult<VideoStreamSummary> {
        if cancel.is_cancelled() {
            return Err(SegCutError::Cancelled);
        }
        Ok(self.stream.clone())
    }
}

fn h264_stream(bit_rate: Option<u64>) -> VideoStreamSummary {
    VideoStreamSummary {
        codec_name: "h264".to_string(),
        bit_rate,
        timebase: Some(Timebase::new(1, 90000).unwrap()),
        duration_seconds: Some(600.0),
        file_size: 750_000_000,
    }
}

async fn plan(probe: Arc<FakeProbe>, cut_start: f64, streams: &[usize]) -> SegCutResult<CutPlan> {
    SmartCutPlanner::new(probe)
        .plan_smart_cut("input.mp4", cut_start, streams, &CancellationToken::new())
        .await
}

#[tokio::test]
async fn test_exact_keyframe_is_lossless() {
    let probe = FakeProbe::new(vec![0.0, 5.0, 10.0], h264_stream(Some(5_000_000)));
    let plan = plan(probe, 5.0, &[0]).await.unwrap();
    assert_eq!(plan, CutPlan::lossless(5.0));
}

#[tokio::test]
async fn test_bridge_to_next_keyframe_scales_bitrate() {
    let probe = FakeProbe::new(vec![0.0, 7.0, 14.0], h264_stream(Some(5_000_000)));
    let plan = plan(probe, 5.0, &[0]).await.unwrap();

    assert_eq!(plan.effective_cut_start, 7.0);
    assert!(plan.needs_reencode);
    let params = plan.reencode_params.unwrap();
    assert_eq!(params.codec, "h264");
    // Declared bitrate scaled by the 1.2 safety factor.
    assert_eq!(params.bitrate_bits_per_second, 6_000_000);
    assert_eq!(params.timebase, Some(Timebase::new(1, 90000).unwrap()));
}

#[tokio::test]
async fn test_bitrate_falls_back_to_file_size_estimate() {
    let probe = FakeProbe::new(vec![0.0, 7.0], h264_stream(None));
    let plan = plan(probe, 5.0, &[0]).await.unwrap();

    // 750 MB * 8 bits over 600s = 10 Mb/s, scaled by 1.2.
    let expected = (750_000_000.0 * 8.0 / 600.0 * 1.2_f64).round() as u64;
    assert_eq!(
        plan.reencode_params.unwrap().bitrate_bits_per_second,
        expected
    );
}

#[tokio::test]
async fn test_bitrate_underivable_is_invalid_input() {
    let mut stream = h264_stream(None);
    stream.duration_seconds = None;
    let probe = FakeProbe::new(vec![0.0, 7.0], stream);

    let err = plan(probe, 5.0, &[0]).await.unwrap_err();
    assert!(matches!(err, SegCutError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_codec_equivalence_table() {
    let mut stream = h264_stream(Some(2_000_000));
    stream.codec_name = "av1".to_string();
    let probe = FakeProbe::new(vec![0.0, 7.0], stream);

    let plan = plan(probe, 5.0, &[0]).await.unwrap();
    assert_eq!(plan.reencode_params.unwrap().codec, "libsvtav1");
}

#[tokio::test]
async fn test_multiple_video_streams_are_ambiguous() {
    let probe = FakeProbe::new(vec![0.0, 7.0], h264_stream(Some(1)));
    let err = plan(probe.clone(), 5.0, &[0, 1]).await.unwrap_err();
    assert!(matches!(err, SegCutError::InvalidInput { .. }));

    let err = plan(probe, 5.0, &[]).await.unwrap_err();
    assert!(matches!(err, SegCutError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_no_keyframe_after_cut_point() {
    // Only keyframes far before the cut point: After finds nothing, even in
    // the widened window.
    let probe = FakeProbe::new(vec![0.0, 2.0], h264_stream(Some(1)));
    let err = plan(probe, 100.0, &[0]).await.unwrap_err();
    assert!(matches!(err, SegCutError::NoKeyframeFound { .. }));
}

#[tokio::test]
async fn test_cancellation_propagates() {
    let probe = FakeProbe::new(vec![0.0, 7.0], h264_stream(Some(1)));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = SmartCutPlanner::new(probe)
        .plan_smart_cut("input.mp4", 5.0, &[0], &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, SegCutError::Cancelled));
}
