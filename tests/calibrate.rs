use axum::{body::to_bytes, http::Request, Router};
use chrono::{DateTime, Duration, TimeZone, Utc};
use sanbernard_rs::pipeline::{build, calibrate, physics};
use sanbernard_rs::types::activity::TrackPoint;
use sanbernard_rs::types::pace::PaceCategory;
use sanbernard_rs::types::route::PhysicsConfig;
use sanbernard_rs::{config::Config, routes, state::AppState};
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    let config = Config::from_env();
    let state = AppState::new(config);
    Router::new()
        .merge(routes::history::router())
        .merge(routes::garmin::router())
        .with_state(state)
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 10, 7, 30, 0).unwrap()
}

fn untimed_track() -> Vec<TrackPoint> {
    (0..20)
        .map(|i| TrackPoint {
            lat: 46.0 + i as f64 * 0.002,
            lon: 7.0,
            elevation: Some(1200.0 + i as f64 * 15.0),
            time: None,
        })
        .collect()
}

fn baseline_seconds(points: &[TrackPoint]) -> f64 {
    let route = build::build(points).expect("route");
    physics::estimate_times(route, 1.0, &PhysicsConfig::default())
        .expect("timed")
        .total_time()
}

/// A track whose recorded duration is `ratio` times the baseline estimate.
fn timed_track(ratio: f64) -> Vec<TrackPoint> {
    let mut points = untimed_track();
    let actual_ms = (baseline_seconds(&points) * ratio * 1000.0).round() as i64;
    let last = points.len() - 1;
    points[0].time = Some(start());
    points[last].time = Some(start() + Duration::milliseconds(actual_ms));
    points
}

#[test]
fn mean_ratio_becomes_pace_factor() {
    let profile = calibrate::calibrate(
        &[timed_track(0.9), timed_track(1.1)],
        &PhysicsConfig::default(),
    );

    assert!(!profile.no_data);
    assert_eq!(profile.activities_analyzed, 2);
    assert!((profile.pace_factor - 1.0).abs() < 1e-6);
    assert_eq!(profile.category, PaceCategory::Typical);
}

#[test]
fn incomplete_activities_are_skipped() {
    let mut missing_end = timed_track(1.3);
    let last = missing_end.len() - 1;
    missing_end[last].time = None;

    let single = vec![TrackPoint {
        lat: 46.0,
        lon: 7.0,
        elevation: None,
        time: Some(start()),
    }];

    let profile = calibrate::calibrate(
        &[untimed_track(), missing_end, single, Vec::new(), timed_track(1.3)],
        &PhysicsConfig::default(),
    );

    assert_eq!(profile.activities_analyzed, 1);
    assert!((profile.pace_factor - 1.3).abs() < 1e-6);
    assert_eq!(profile.category, PaceCategory::Leisurely);
}

#[test]
fn stationary_activity_is_skipped() {
    let mut points = vec![
        TrackPoint {
            lat: 46.0,
            lon: 7.0,
            elevation: Some(1000.0),
            time: Some(start()),
        };
        3
    ];
    points[2].time = Some(start() + Duration::minutes(30));

    assert_eq!(calibrate::duration_ratio(&points, &PhysicsConfig::default()), None);
}

#[test]
fn no_usable_activities_gives_neutral_profile() {
    let profile = calibrate::calibrate(&[untimed_track()], &PhysicsConfig::default());

    assert!(profile.no_data);
    assert_eq!(profile.pace_factor, 1.0);
    assert_eq!(profile.activities_analyzed, 0);

    let empty = calibrate::calibrate(&[], &PhysicsConfig::default());
    assert!(empty.no_data);
    assert_eq!(empty.pace_factor, 1.0);
}

#[test]
fn pace_category_thresholds() {
    assert_eq!(PaceCategory::from_factor(0.79), PaceCategory::SignificantlyFaster);
    assert_eq!(PaceCategory::from_factor(0.8), PaceCategory::Faster);
    assert_eq!(PaceCategory::from_factor(0.95), PaceCategory::Typical);
    assert_eq!(PaceCategory::from_factor(1.05), PaceCategory::Relaxed);
    assert_eq!(PaceCategory::from_factor(1.2), PaceCategory::Leisurely);
    assert_eq!(PaceCategory::Relaxed.label(), "relaxed pace");
    assert_eq!(PaceCategory::SignificantlyFaster.label(), "significantly faster");
}

fn gpx_for(points: &[TrackPoint]) -> String {
    let trkpts: String = points
        .iter()
        .map(|p| {
            let ele = p.elevation.map(|e| format!("<ele>{e}</ele>")).unwrap_or_default();
            let time = p
                .time
                .map(|t| format!("<time>{}</time>", t.to_rfc3339()))
                .unwrap_or_default();
            format!("<trkpt lat=\"{}\" lon=\"{}\">{ele}{time}</trkpt>", p.lat, p.lon)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><gpx version="1.1"><trk><trkseg>{trkpts}</trkseg></trk></gpx>"#
    )
}

fn multipart_files(files: &[(&str, String)], boundary: &str) -> String {
    let mut body = String::new();
    for (file_name, content) in files {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\nContent-Type: application/gpx+xml\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body
}

async fn analyze(body: String, boundary: &str) -> (axum::http::StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/analyze-history")
                .method("POST")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(axum::body::Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&body).expect("json"))
}

#[tokio::test]
async fn analyze_history_averages_uploaded_files() {
    let boundary = "X-BOUNDARY-TEST";
    let body = multipart_files(
        &[
            ("fast.gpx", gpx_for(&timed_track(0.75))),
            ("slow.gpx", gpx_for(&timed_track(0.95))),
            ("notes.txt", "not a track".to_string()),
            ("broken.gpx", "<gpx><trk><trkseg></trkseg></trk></gpx>".to_string()),
        ],
        boundary,
    );
    let (status, json) = analyze(body, boundary).await;

    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(json["activities_analyzed"], 2);
    assert!((json["pace_factor"].as_f64().unwrap() - 0.85).abs() < 1e-3);
    assert_eq!(json["category"], "faster than average");
    assert_eq!(json["no_data"], false);
    assert!(json.get("message").is_none());
}

#[tokio::test]
async fn analyze_history_without_timing_reports_no_data() {
    let boundary = "X-BOUNDARY-TEST";
    let body = multipart_files(&[("plan.gpx", gpx_for(&untimed_track()))], boundary);
    let (status, json) = analyze(body, boundary).await;

    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(json["pace_factor"], 1.0);
    assert_eq!(json["no_data"], true);
    assert_eq!(json["activities_analyzed"], 0);
    assert!(json["message"].as_str().is_some());
}

#[tokio::test]
async fn analyze_history_requires_files() {
    let boundary = "X-BOUNDARY-TEST";
    let (status, _) = analyze(format!("--{boundary}--\r\n"), boundary).await;
    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn garmin_routes_require_bearer_token() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/garmin/activities")
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
}
