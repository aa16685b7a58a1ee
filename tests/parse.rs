use chrono::{TimeZone, Utc};
use sanbernard_rs::error::ParseError;
use sanbernard_rs::pipeline::{build, calibrate, parse};
use sanbernard_rs::types::activity::FileFormat;
use sanbernard_rs::types::route::PhysicsConfig;

fn multi_segment_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><name>Day one</name>
    <trkseg>
      <trkpt lat="46.0" lon="7.0"><ele>1000</ele><time>2026-06-01T08:00:00Z</time></trkpt>
      <trkpt lat="46.001" lon="7.0"><ele>1010</ele><time>2026-06-01T08:02:00Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="46.002" lon="7.0"><ele>1020</ele></trkpt>
      <trkpt lat="46.003" lon="7.0"/>
    </trkseg>
  </trk>
  <rte><name>Planned</name>
    <rtept lat="46.004" lon="7.0"><ele>1040</ele></rtept>
    <rtept lat="46.005" lon="7.0"><ele>1050</ele></rtept>
  </rte>
</gpx>"#
}

#[test]
fn gpx_keeps_segments_and_route_points() {
    let parsed = parse::parse(multi_segment_gpx().as_bytes(), FileFormat::Gpx).expect("parsed");

    assert_eq!(parsed.segments.len(), 2);
    assert_eq!(parsed.segments[0].len(), 2);
    assert_eq!(parsed.segments[1].len(), 2);
    assert_eq!(parsed.route_points.len(), 2);
    assert_eq!(parsed.point_count(), 6);

    let first = &parsed.segments[0][0];
    assert_eq!(first.elevation, Some(1000.0));
    assert!(first.time.is_some());
    assert_eq!(parsed.segments[1][1].elevation, None);
    assert!(parsed.route_points[0].time.is_none());
}

#[test]
fn flattened_points_accumulate_distance_across_groups() {
    let parsed = parse::parse(multi_segment_gpx().as_bytes(), FileFormat::Gpx).expect("parsed");
    let points = parsed.points();
    let lats: Vec<f64> = points.iter().map(|p| p.lat).collect();
    assert_eq!(lats, vec![46.0, 46.001, 46.002, 46.003, 46.004, 46.005]);

    let route = build::build(&points).expect("route");
    let expected = build::haversine_distance(46.0, 7.0, 46.005, 7.0);
    assert!((route.total_distance - expected).abs() < 1e-6);
    for pair in route.points.windows(2) {
        assert!(pair[1].distance_from_start > pair[0].distance_from_start);
    }
}

#[test]
fn gpx_times_without_offset_are_read_as_utc() {
    let gpx = r#"<?xml version="1.0"?>
<gpx version="1.1" creator="watch">
  <trk><trkseg>
    <trkpt lat="46.0" lon="7.0"><ele>1000</ele><time>2026-06-01T08:00:00</time></trkpt>
    <trkpt lat="46.02" lon="7.0"><ele>1100</ele><time>2026-06-01T08:40:00.500</time></trkpt>
  </trkseg></trk>
</gpx>"#;
    let parsed = parse::parse(gpx.as_bytes(), FileFormat::Gpx).expect("parsed");
    let track = &parsed.segments[0];

    assert_eq!(
        track[0].time,
        Some(Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap())
    );
    let last = track[1].time.expect("fractional seconds parse");
    assert_eq!(last.timestamp(), Utc.with_ymd_and_hms(2026, 6, 1, 8, 40, 0).unwrap().timestamp());

    let profile = calibrate::calibrate(&parsed.segments, &PhysicsConfig::default());
    assert_eq!(profile.activities_analyzed, 1);
    assert!(!profile.no_data);
}

#[test]
fn gpx_without_points_is_empty() {
    let gpx = r#"<?xml version="1.0"?><gpx version="1.1"><metadata/></gpx>"#;
    let result = parse::parse(gpx.as_bytes(), FileFormat::Gpx);
    assert!(matches!(result, Err(ParseError::EmptyFile)));
}

#[test]
fn malformed_gpx_is_rejected() {
    let gpx = r#"<gpx><trk><trkseg><trkpt lat="46.0" lon="7.0"></trkseg></gpx>"#;
    let result = parse::parse(gpx.as_bytes(), FileFormat::Gpx);
    assert!(matches!(result, Err(ParseError::InvalidGpx(_))));
}

#[test]
fn garbage_fit_is_rejected() {
    let result = parse::parse(b"definitely not a fit file", FileFormat::Fit);
    assert!(matches!(result, Err(ParseError::InvalidFit(_))));
}

#[test]
fn file_format_from_extension() {
    assert!(matches!(FileFormat::from_filename("hike.GPX"), Some(FileFormat::Gpx)));
    assert!(matches!(FileFormat::from_filename("watch.fit"), Some(FileFormat::Fit)));
    assert!(FileFormat::from_filename("notes.txt").is_none());
}
