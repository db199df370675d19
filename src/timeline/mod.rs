//! Pure interval algebra over segment lists
//!
//! Every function here is side-effect free and never mutates its input:
//! consumers pass the current segment collection plus the total media
//! duration and get fresh derived values back. "Normal" edge cases
//! (zero-length gaps, empty inputs) produce filtered/empty results rather
//! than errors; only genuinely undefined operations raise
//! [`SegCutError::InvalidInput`].

use std::collections::{HashMap, HashSet};

use crate::domain::model::{is_valid_duration, Bound, Segment, SegmentId};
use crate::error::{SegCutError, SegCutResult};

/// Derived views of a segment collection for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    /// Complement of the collection against the full timeline
    pub gaps: Vec<Segment>,
    /// Whether any two segments overlap
    pub overlaps_exist: bool,
    /// Sum of the resolved durations of the selected segments
    pub total_selected_duration: f64,
}

/// Sort segments by apparent start time (stable, so collection order breaks
/// ties)
pub fn sort_by_apparent_start(segments: &[Segment]) -> Vec<Segment> {
    let mut sorted = segments.to_vec();
    sorted.sort_by(|a, b| a.apparent_start().total_cmp(&b.apparent_start()));
    sorted
}

/// Partition segments into maximal groups that mutually overlap, directly or
/// transitively through a chain.
///
/// Sweeps segments by apparent start while tracking the running maximum end
/// of the current group. Two segments overlap iff the later start is
/// strictly before the earlier segment's apparent end; touching endpoints do
/// not overlap. Groups of size 1 are excluded, and members of each group are
/// returned sorted by apparent start.
pub fn partition_into_overlapping_ranges(
    segments: &[Segment],
    total_duration: Option<f64>,
) -> Vec<Vec<Segment>> {
    let sorted = sort_by_apparent_start(segments);

    let mut groups = Vec::new();
    let mut current: Vec<Segment> = Vec::new();
    let mut running_max_end = f64::NEG_INFINITY;

    for segment in sorted {
        let end = segment.apparent_end(total_duration);
        if !current.is_empty() && segment.apparent_start() < running_max_end {
            running_max_end = running_max_end.max(end);
            current.push(segment);
        } else {
            if current.len() > 1 {
                groups.push(current);
            }
            running_max_end = end;
            current = vec![segment];
        }
    }
    if current.len() > 1 {
        groups.push(current);
    }

    groups
}

/// Single source of truth for overlap detection, shared by export
/// validation, inversion gating and chaptering
pub fn has_overlap(segments: &[Segment], total_duration: Option<f64>) -> bool {
    !partition_into_overlapping_ranges(segments, total_duration).is_empty()
}

/// Merge every overlap group down to one segment.
///
/// The group member with the smallest apparent start survives and its end is
/// extended to the maximum end across the group; the other members are
/// dropped. Non-overlapping segments pass through unchanged and the result
/// follows the original collection order, so unrelated segments never get
/// reshuffled.
pub fn combine_overlapping_segments(
    segments: &[Segment],
    total_duration: Option<f64>,
) -> Vec<Segment> {
    let groups = partition_into_overlapping_ranges(segments, total_duration);

    let mut dropped: HashSet<SegmentId> = HashSet::new();
    let mut merged: HashMap<SegmentId, Segment> = HashMap::new();

    for group in groups {
        // Group members are sorted by apparent start; the first one is kept.
        let keeper = &group[0];
        let mut max_end = keeper.apparent_end(total_duration);
        let mut end_bound = keeper.end;

        for member in &group[1..] {
            let end = member.apparent_end(total_duration);
            if end > max_end {
                max_end = end;
                end_bound = member.end;
            }
            dropped.insert(member.id.clone());
        }

        let mut replacement = keeper.clone();
        replacement.end = end_bound;
        merged.insert(keeper.id.clone(), replacement);
    }

    segments
        .iter()
        .filter(|segment| !dropped.contains(&segment.id))
        .map(|segment| merged.remove(&segment.id).unwrap_or_else(|| segment.clone()))
        .collect()
}

/// Replace all selected segments with a single segment spanning from the
/// minimum apparent start to the maximum apparent end across the selection.
///
/// Unlike [`combine_overlapping_segments`] the merge is forced by selection:
/// the selected segments need not overlap. The merged segment keeps the
/// identity (id, name, tags) of the first selected segment in collection
/// order; unselected segments pass through unchanged.
pub fn combine_selected_segments(
    segments: &[Segment],
    selected: &HashSet<SegmentId>,
    total_duration: Option<f64>,
) -> Vec<Segment> {
    let chosen: Vec<&Segment> = segments
        .iter()
        .filter(|segment| selected.contains(&segment.id))
        .collect();
    if chosen.is_empty() {
        return segments.to_vec();
    }

    let mut min_start = chosen[0].apparent_start();
    let mut start_bound = chosen[0].start;
    let mut max_end = chosen[0].apparent_end(total_duration);
    let mut end_bound = chosen[0].end;

    for segment in &chosen[1..] {
        let start = segment.apparent_start();
        if start < min_start {
            min_start = start;
            start_bound = segment.start;
        }
        let end = segment.apparent_end(total_duration);
        if end > max_end {
            max_end = end;
            end_bound = segment.end;
        }
    }

    let mut out = Vec::with_capacity(segments.len() - chosen.len() + 1);
    let mut emitted = false;
    for segment in segments {
        if !selected.contains(&segment.id) {
            out.push(segment.clone());
        } else if !emitted {
            let mut span = segment.clone();
            span.start = start_bound;
            span.end = end_bound;
            out.push(span);
            emitted = true;
        }
    }
    out
}

/// For gap derivation a marker anchors at its own start: a point of interest
/// is zero-width once resolved, it never swallows the rest of the timeline.
fn gap_anchor_end(segment: &Segment) -> f64 {
    match segment.end {
        Bound::Fixed(seconds) => seconds,
        Bound::Open => segment.apparent_start(),
    }
}

/// Derive the complement ("removed" parts) of a segment collection.
///
/// Inversion is undefined on overlapping timelines and returns an empty list
/// when any adjacent pair overlaps. Produces one gap between every pair of
/// adjacent originals (sorted by start), optionally a leading gap from 0 to
/// the first start, and optionally a trailing gap from the last end to the
/// total duration when that duration is known. Zero-length and negative
/// gaps are filtered. Each gap id is composed from the ids of its bounding
/// originals, giving UI list-diffing a stable key without reusing original
/// ids.
pub fn invert_segments(
    segments: &[Segment],
    include_first: bool,
    include_last: bool,
    total_duration: Option<f64>,
) -> Vec<Segment> {
    if segments.is_empty() {
        return Vec::new();
    }

    let sorted = sort_by_apparent_start(segments);

    let overlapping = sorted
        .windows(2)
        .any(|pair| gap_anchor_end(&pair[0]) > pair[1].apparent_start());
    if overlapping {
        return Vec::new();
    }

    let mut gaps = Vec::new();

    if include_first {
        let first = &sorted[0];
        let first_start = first.apparent_start();
        if first_start > 0.0 {
            gaps.push(gap_segment(
                SegmentId::compose(&SegmentId::timeline_start(), &first.id),
                0.0,
                first_start,
            ));
        }
    }

    for pair in sorted.windows(2) {
        let gap_start = gap_anchor_end(&pair[0]);
        let gap_end = pair[1].apparent_start();
        if gap_end > gap_start {
            gaps.push(gap_segment(
                SegmentId::compose(&pair[0].id, &pair[1].id),
                gap_start,
                gap_end,
            ));
        }
    }

    if include_last {
        if let (Some(duration), Some(last)) = (
            total_duration.filter(|d| is_valid_duration(*d)),
            sorted.last(),
        ) {
            let gap_start = gap_anchor_end(last);
            if duration > gap_start {
                gaps.push(gap_segment(
                    SegmentId::compose(&last.id, &SegmentId::timeline_end()),
                    gap_start,
                    duration,
                ));
            }
        }
    }

    gaps
}

fn gap_segment(id: SegmentId, start: f64, end: f64) -> Segment {
    let mut segment = Segment::new(Bound::Fixed(start), Bound::Fixed(end));
    segment.id = id;
    segment
}

/// Turn a segment collection into contiguous chapters.
///
/// Chapters must cover every instant from the first segment's start to the
/// last segment's end with no gaps and no overlap, so overlapping input is
/// rejected and the holes are filled with gap segments before sorting the
/// union by start.
pub fn segments_to_chapters(
    segments: &[Segment],
    total_duration: Option<f64>,
) -> SegCutResult<Vec<Segment>> {
    if segments.is_empty() {
        return Ok(Vec::new());
    }
    if has_overlap(segments, total_duration) {
        return Err(SegCutError::invalid_input(
            "Cannot derive chapters from overlapping segments",
        ));
    }

    let mut chapters = segments.to_vec();
    chapters.extend(invert_segments(segments, true, false, total_duration));
    Ok(sort_by_apparent_start(&chapters))
}

/// Derived views consumed by the rendering layer on every update
pub fn compute_derived_views(
    segments: &[Segment],
    selected: &HashSet<SegmentId>,
    total_duration: Option<f64>,
) -> DerivedViews {
    let total_selected_duration = segments
        .iter()
        .filter(|segment| selected.contains(&segment.id))
        .map(|segment| segment.apparent_duration(total_duration))
        .sum();

    DerivedViews {
        gaps: invert_segments(segments, true, true, total_duration),
        overlaps_exist: has_overlap(segments, total_duration),
        total_selected_duration,
    }
}
