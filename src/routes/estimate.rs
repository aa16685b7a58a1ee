use axum::extract::Multipart;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::pipeline::{build, parse, physics};
use crate::state::AppState;
use crate::types::activity::{FileFormat, TrackPoint};
use crate::types::route::{PhysicsConfig, RouteBounds, RoutePoint};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/parse-gpx", post(parse_gpx))
        .route("/api/estimate", post(estimate))
}

#[derive(Serialize, Deserialize)]
pub struct RouteResponse {
    pub points: Vec<RoutePoint>,
    pub total_distance: f64,
    pub total_ascent: f64,
    pub total_descent: f64,
    pub estimated_total_time: f64,
    pub estimated_total_time_formatted: String,
    pub bounds: Option<RouteBounds>,
}

#[derive(Deserialize)]
struct EstimateRequest {
    points: Vec<TrackPoint>,
    pace_factor: Option<f64>,
}

async fn parse_gpx(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RouteResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut pace_factor = 1.0;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                file_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            AppError::BadRequest(format!("Failed to read file bytes: {}", e))
                        })?
                        .to_vec(),
                );
            }
            "pace_factor" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read pace_factor: {}", e))
                })?;
                pace_factor = text.trim().parse().map_err(|_| {
                    AppError::BadRequest(format!("Invalid pace_factor: {}", text))
                })?;
            }
            _ => {}
        }
    }

    let bytes = file_bytes.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let filename = filename
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("No file selected".to_string()))?;
    let format = FileFormat::from_filename(&filename)
        .ok_or_else(|| AppError::BadRequest("Unsupported file format".to_string()))?;

    tracing::info!("Parsing {} file: {}", format.name(), filename);

    let parsed = parse::parse(&bytes, format)?;
    let response = estimate_route(&parsed.points(), pace_factor, &state.config().physics)?;

    tracing::info!(
        "Estimated {} ({} points, {:.2} km, {})",
        filename,
        response.points.len(),
        response.total_distance / 1000.0,
        response.estimated_total_time_formatted
    );

    Ok(Json(response))
}

async fn estimate(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let response = estimate_route(
        &req.points,
        req.pace_factor.unwrap_or(1.0),
        &state.config().physics,
    )?;

    tracing::info!(
        "Estimated route of {} points: {}",
        response.points.len(),
        response.estimated_total_time_formatted
    );

    Ok(Json(response))
}

fn estimate_route(
    points: &[TrackPoint],
    pace_factor: f64,
    physics_config: &PhysicsConfig,
) -> Result<RouteResponse, AppError> {
    let route = build::build(points)?;
    let route = physics::estimate_times(route, pace_factor, physics_config)?;
    let total_time = route.total_time();

    Ok(RouteResponse {
        estimated_total_time: total_time,
        estimated_total_time_formatted: physics::format_duration(total_time),
        total_distance: route.total_distance,
        total_ascent: route.total_ascent,
        total_descent: route.total_descent,
        bounds: route.bounds,
        points: route.points,
    })
}
