use axum::extract::Multipart;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::pipeline::{calibrate, parse};
use crate::state::AppState;
use crate::types::activity::{FileFormat, TrackPoint};
use crate::types::pace::PaceProfile;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/analyze-history", post(analyze_history))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalibrationResponse {
    pub pace_factor: f64,
    pub activities_analyzed: usize,
    pub category: String,
    pub interpretation: String,
    pub no_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<PaceProfile> for CalibrationResponse {
    fn from(profile: PaceProfile) -> Self {
        Self {
            pace_factor: (profile.pace_factor * 1000.0).round() / 1000.0,
            activities_analyzed: profile.activities_analyzed,
            category: profile.category.label().to_string(),
            interpretation: profile.category.describe().to_string(),
            no_data: profile.no_data,
            message: profile
                .no_data
                .then(|| "No valid activities with timing data found".to_string()),
        }
    }
}

async fn analyze_history(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CalibrationResponse>, AppError> {
    let mut file_count = 0usize;
    let mut activities: Vec<Vec<TrackPoint>> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("files") {
            continue;
        }
        file_count += 1;

        let filename = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file bytes: {}", e)))?;

        let Some(format) = FileFormat::from_filename(&filename) else {
            tracing::warn!("Skipping history file with unsupported format: {}", filename);
            continue;
        };

        match parse::parse(&bytes, format) {
            Ok(parsed) => activities.extend(parsed.segments),
            Err(err) => tracing::warn!("Skipping unreadable history file {}: {}", filename, err),
        }
    }

    if file_count == 0 {
        return Err(AppError::BadRequest("No files provided".to_string()));
    }

    tracing::info!(
        "Analyzing {} activities from {} files",
        activities.len(),
        file_count
    );

    let profile = calibrate::calibrate(&activities, &state.config().physics);
    Ok(Json(profile.into()))
}
