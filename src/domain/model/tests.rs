// Unit tests for domain models

use super::*;

#[test]
fn test_segment_ids_are_unique() {
    let a = Segment::new(Bound::Fixed(0.0), Bound::Fixed(1.0));
    let b = Segment::new(Bound::Fixed(0.0), Bound::Fixed(1.0));
    assert_ne!(a.id, b.id);
}

#[test]
fn test_composed_id_is_stable() {
    let a = SegmentId::new();
    let b = SegmentId::new();
    assert_eq!(SegmentId::compose(&a, &b), SegmentId::compose(&a, &b));
    assert_ne!(SegmentId::compose(&a, &b), SegmentId::compose(&b, &a));
    assert_ne!(SegmentId::compose(&a, &b), a);
}

#[test]
fn test_apparent_start_defaults_to_zero() {
    let seg = Segment::new(Bound::Open, Bound::Fixed(5.0));
    assert_eq!(seg.apparent_start(), 0.0);

    let seg = Segment::new(Bound::Fixed(2.5), Bound::Fixed(5.0));
    assert_eq!(seg.apparent_start(), 2.5);
}

#[test]
fn test_apparent_end_uses_valid_duration() {
    let marker = Segment::new(Bound::Fixed(1.0), Bound::Open);
    assert!(marker.is_marker());
    assert_eq!(marker.apparent_end(Some(100.0)), 100.0);
}

#[test]
fn test_apparent_end_rejects_invalid_duration() {
    let marker = Segment::new(Bound::Fixed(1.0), Bound::Open);
    // Media not loaded yet: NaN, infinite, zero and missing durations all
    // resolve open ends to 0.
    assert_eq!(marker.apparent_end(None), 0.0);
    assert_eq!(marker.apparent_end(Some(f64::NAN)), 0.0);
    assert_eq!(marker.apparent_end(Some(f64::INFINITY)), 0.0);
    assert_eq!(marker.apparent_end(Some(0.0)), 0.0);
    assert_eq!(marker.apparent_end(Some(-3.0)), 0.0);
}

#[test]
fn test_apparent_duration_clamps_at_zero() {
    let marker = Segment::new(Bound::Fixed(1.0), Bound::Open);
    // Without a valid total duration the marker's end resolves to 0, which
    // is before its start; the resolved duration must not go negative.
    assert_eq!(marker.apparent_duration(None), 0.0);

    let seg = Segment::new(Bound::Fixed(1.0), Bound::Fixed(4.0));
    assert_eq!(seg.apparent_duration(None), 3.0);
}

#[test]
fn test_is_valid_duration() {
    assert!(is_valid_duration(1.0));
    assert!(is_valid_duration(0.001));
    assert!(!is_valid_duration(0.0));
    assert!(!is_valid_duration(-1.0));
    assert!(!is_valid_duration(f64::NAN));
    assert!(!is_valid_duration(f64::INFINITY));
}

#[test]
fn test_timebase_creation() {
    let timebase = Timebase::new(1, 90000).unwrap();
    assert_eq!(timebase.to_seconds(), 1.0 / 90000.0);
    assert!(Timebase::new(1, 0).is_err());
}

#[test]
fn test_timebase_parse() {
    let timebase = Timebase::parse("1/25").unwrap();
    assert_eq!(timebase, Timebase::new(1, 25).unwrap());

    assert!(Timebase::parse("25").is_err());
    assert!(Timebase::parse("a/b").is_err());
    assert!(Timebase::parse("1/0").is_err());
}

#[test]
fn test_cut_plan_constructors() {
    let plan = CutPlan::lossless(5.0);
    assert_eq!(plan.effective_cut_start, 5.0);
    assert!(!plan.needs_reencode);
    assert!(plan.reencode_params.is_none());

    let params = ReencodeParams {
        codec: "libx264".to_string(),
        bitrate_bits_per_second: 6_000_000,
        timebase: None,
    };
    let plan = CutPlan::bridged(7.0, params.clone());
    assert_eq!(plan.effective_cut_start, 7.0);
    assert!(plan.needs_reencode);
    assert_eq!(plan.reencode_params, Some(params));
}
