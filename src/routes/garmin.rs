//! Garmin Connect routes.
//!
//! There is no login endpoint here: the service never sees Garmin
//! credentials. Every route expects `Authorization: Bearer <token>` carrying
//! a Garmin Connect OAuth access token the client obtained itself, and
//! answers 401 when it is missing.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::clients::garmin::ActivitySummary;
use crate::error::AppError;
use crate::pipeline::{calibrate, parse};
use crate::routes::history::CalibrationResponse;
use crate::state::AppState;
use crate::types::activity::FileFormat;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/garmin/activities", get(list_activities))
        .route("/api/garmin/activity/:activity_id/gpx", get(activity_gpx))
        .route("/api/garmin/calibrate", post(calibrate_from_garmin))
}

#[derive(Debug, Serialize)]
struct ActivityListResponse {
    connected: bool,
    activities_count: usize,
    activities: Vec<ActivitySummary>,
}

#[derive(Debug, Serialize)]
struct GpxResponse {
    gpx: String,
}

#[derive(Debug, Deserialize)]
struct CalibrateRequest {
    activity_ids: Vec<String>,
}

async fn list_activities(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ActivityListResponse>, AppError> {
    let token = require_bearer(&headers)?;
    let activities = state
        .garmin()
        .list_activities(&token, state.config().garmin_activity_limit)
        .await?;

    tracing::info!("Fetched {} Garmin activities", activities.len());

    Ok(Json(ActivityListResponse {
        connected: true,
        activities_count: activities.len(),
        activities,
    }))
}

async fn activity_gpx(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<GpxResponse>, AppError> {
    let token = require_bearer(&headers)?;
    let gpx = state.garmin().download_gpx(&token, &activity_id).await?;
    Ok(Json(GpxResponse { gpx }))
}

async fn calibrate_from_garmin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CalibrateRequest>,
) -> Result<Json<CalibrationResponse>, AppError> {
    let token = require_bearer(&headers)?;
    if req.activity_ids.is_empty() {
        return Err(AppError::BadRequest("No activity_ids provided".to_string()));
    }

    let mut activities = Vec::new();
    for activity_id in &req.activity_ids {
        let gpx = match state.garmin().download_gpx(&token, activity_id).await {
            Ok(gpx) => gpx,
            Err(err) => {
                tracing::warn!("Skipping Garmin activity {}: {}", activity_id, err);
                continue;
            }
        };
        match parse::parse(gpx.as_bytes(), FileFormat::Gpx) {
            Ok(parsed) => activities.extend(parsed.segments),
            Err(err) => tracing::warn!("Skipping Garmin activity {}: {}", activity_id, err),
        }
    }

    let profile = calibrate::calibrate(&activities, &state.config().physics);
    Ok(Json(profile.into()))
}

/// Extracts the caller's Garmin access token from `Authorization: Bearer`.
fn require_bearer(headers: &HeaderMap) -> Result<String, AppError> {
    let raw = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Garmin Bearer token".to_string()))?;
    raw.strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Malformed Garmin Bearer token".to_string()))
}
