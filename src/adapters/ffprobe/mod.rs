//! FFprobe adapter for media file probing
//!
//! Spawns `ffprobe` as a subprocess per query and parses its `-of json`
//! output. The process is killed when the caller's cancellation token fires;
//! the call then fails with [`SegCutError::Cancelled`], distinct from a
//! probe that ran and found nothing.

use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::model::{KeyframeSample, Timebase, VideoStreamSummary};
use crate::error::{SegCutError, SegCutResult};
use crate::ports::{MediaProbePort, TimeWindow};

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    ffprobe_path: String,
}

impl FfprobeAdapter {
    /// Adapter resolving `ffprobe` from PATH
    pub fn new() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
        }
    }

    /// Adapter using an explicit ffprobe binary
    pub fn with_path(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    async fn run_ffprobe(&self, args: &[String], cancel: &CancellationToken) -> SegCutResult<Vec<u8>> {
        debug!(?args, "spawning ffprobe");
        let child = Command::new(&self.ffprobe_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        tokio::select! {
            _ = cancel.cancelled() => {
                // Dropping the child future kills the process (kill_on_drop).
                Err(SegCutError::Cancelled)
            }
            output = child.wait_with_output() => {
                let output = output?;
                if !output.status.success() {
                    return Err(SegCutError::ProbeFailed {
                        message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    });
                }
                Ok(output.stdout)
            }
        }
    }
}

impl Default for FfprobeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProbePort for FfprobeAdapter {
    async fn probe_keyframes(
        &self,
        file_path: &str,
        stream_index: usize,
        window: TimeWindow,
        cancel: &CancellationToken,
    ) -> SegCutResult<Vec<KeyframeSample>> {
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            stream_index.to_string(),
            "-show_packets".to_string(),
            "-read_intervals".to_string(),
            format!("{}%{}", window.from, window.to),
            "-show_entries".to_string(),
            "packet=pts_time,flags".to_string(),
            "-of".to_string(),
            "json".to_string(),
            file_path.to_string(),
        ];

        let stdout = self.run_ffprobe(&args, cancel).await?;
        let report: PacketReport = serde_json::from_slice(&stdout)?;
        Ok(parse_packet_samples(report))
    }

    async fn probe_stream(
        &self,
        file_path: &str,
        stream_index: usize,
        cancel: &CancellationToken,
    ) -> SegCutResult<VideoStreamSummary> {
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_streams".to_string(),
            "-show_format".to_string(),
            "-of".to_string(),
            "json".to_string(),
            file_path.to_string(),
        ];

        let stdout = self.run_ffprobe(&args, cancel).await?;
        let report: MediaReport = serde_json::from_slice(&stdout)?;
        parse_stream_summary(report, stream_index)
    }
}

// ffprobe -of json output shapes. Numeric fields arrive as strings.

#[derive(Debug, Deserialize)]
struct PacketReport {
    #[serde(default)]
    packets: Vec<PacketEntry>,
}

#[derive(Debug, Deserialize)]
struct PacketEntry {
    pts_time: Option<String>,
    #[serde(default)]
    flags: String,
}

#[derive(Debug, Deserialize)]
struct MediaReport {
    #[serde(default)]
    streams: Vec<StreamEntry>,
    format: Option<FormatEntry>,
}

#[derive(Debug, Deserialize)]
struct StreamEntry {
    index: usize,
    codec_name: Option<String>,
    codec_type: Option<String>,
    bit_rate: Option<String>,
    time_base: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FormatEntry {
    size: Option<String>,
    duration: Option<String>,
}

/// Map packet entries to keyframe samples, ascending by time.
/// Packets without a pts_time (e.g. flushed B-frames) are skipped.
fn parse_packet_samples(report: PacketReport) -> Vec<KeyframeSample> {
    let mut samples: Vec<KeyframeSample> = report
        .packets
        .into_iter()
        .filter_map(|packet| {
            let time = packet.pts_time?.parse::<f64>().ok()?;
            Some(KeyframeSample {
                time,
                keyframe: packet.flags.contains('K'),
            })
        })
        .collect();
    // Presentation order can differ from packet order around B-frames.
    samples.sort_by(|a, b| a.time.total_cmp(&b.time));
    samples
}

fn parse_stream_summary(report: MediaReport, stream_index: usize) -> SegCutResult<VideoStreamSummary> {
    let stream = report
        .streams
        .into_iter()
        .find(|stream| stream.index == stream_index)
        .ok_or_else(|| {
            SegCutError::invalid_input(format!("Stream {} not found", stream_index))
        })?;

    if stream.codec_type.as_deref() != Some("video") {
        return Err(SegCutError::invalid_input(format!(
            "Stream {} is not a video stream",
            stream_index
        )));
    }

    let codec_name = stream.codec_name.ok_or_else(|| SegCutError::ProbeFailed {
        message: format!("Stream {} reports no codec name", stream_index),
    })?;

    let format = report.format.unwrap_or(FormatEntry {
        size: None,
        duration: None,
    });
    let file_size = format
        .size
        .as_deref()
        .and_then(|size| size.parse::<u64>().ok())
        .ok_or_else(|| SegCutError::ProbeFailed {
            message: "Probe reported no file size".to_string(),
        })?;

    // Stream duration when present, else container duration.
    let duration_seconds = stream
        .duration
        .as_deref()
        .and_then(|raw| raw.parse::<f64>().ok())
        .or_else(|| {
            format
                .duration
                .as_deref()
                .and_then(|raw| raw.parse::<f64>().ok())
        });

    Ok(VideoStreamSummary {
        codec_name,
        bit_rate: stream.bit_rate.as_deref().and_then(|raw| raw.parse::<u64>().ok()),
        timebase: stream
            .time_base
            .as_deref()
            .and_then(|raw| Timebase::parse(raw).ok()),
        duration_seconds,
        file_size,
    })
}
