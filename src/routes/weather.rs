use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, RouteError};
use crate::pipeline::{physics, summarize, weather};
use crate::state::AppState;
use crate::types::route::{Route, RoutePoint};
use crate::types::weather::{WeatherSample, WeatherSummary};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/weather", post(apply_weather))
}

#[derive(Deserialize)]
struct WeatherRequest {
    #[serde(default)]
    points: Vec<RoutePoint>,
    start_time: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize)]
pub struct WeatherPoint {
    #[serde(flatten)]
    pub point: RoutePoint,
    pub weather: Option<WeatherSample>,
}

#[derive(Serialize, Deserialize)]
pub struct WeatherResponse {
    pub points: Vec<WeatherPoint>,
    pub weather_summary: WeatherSummary,
    pub estimated_total_time: f64,
    pub estimated_total_time_formatted: String,
}

async fn apply_weather(
    State(state): State<AppState>,
    Json(req): Json<WeatherRequest>,
) -> Result<Json<WeatherResponse>, AppError> {
    if req.points.is_empty() {
        return Err(RouteError::EmptyRoute.into());
    }

    let start_time = req.start_time.unwrap_or_else(Utc::now);
    let route = Route::from_annotated(req.points);

    tracing::info!(
        "Applying weather to {} points starting {}",
        route.points.len(),
        start_time
    );

    let overlay =
        weather::apply_weather(route, start_time, state.weather(), &state.config().weather)
            .await?;
    let weather_summary = summarize::summarize(&overlay.samples);
    let total_time = overlay.route.total_time();

    let points = overlay
        .route
        .points
        .into_iter()
        .zip(overlay.samples)
        .map(|(point, weather)| WeatherPoint { point, weather })
        .collect();

    Ok(Json(WeatherResponse {
        points,
        weather_summary,
        estimated_total_time: total_time,
        estimated_total_time_formatted: physics::format_duration(total_time),
    }))
}
