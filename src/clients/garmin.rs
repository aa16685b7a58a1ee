use serde::Serialize;
use serde_json::Value;

use crate::error::FitnessError;

/// Garmin Connect API client. Callers supply an already-issued bearer token.
#[derive(Debug, Clone)]
pub struct GarminClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivitySummary {
    pub activity_id: String,
    pub activity_name: String,
    pub start_time_local: Option<String>,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub activity_type: Option<String>,
}

impl GarminClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn list_activities(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<ActivitySummary>, FitnessError> {
        let url = format!(
            "{}/activitylist-service/activities/search/activities",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("limit", limit.to_string()),
                ("activityType", "hiking,walking,running".to_string()),
            ])
            .send()
            .await
            .map_err(|err| FitnessError::Request(err.to_string()))?;

        let response = ensure_success(response).await?;
        let payload: Vec<Value> = response
            .json()
            .await
            .map_err(|err| FitnessError::Payload(err.to_string()))?;

        Ok(payload.iter().filter_map(summary_from_value).collect())
    }

    /// Downloads the GPX export of an activity.
    pub async fn download_gpx(
        &self,
        access_token: &str,
        activity_id: &str,
    ) -> Result<String, FitnessError> {
        let url = format!(
            "{}/download-service/files/activity/{}",
            self.base_url, activity_id
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("format", "gpx")])
            .send()
            .await
            .map_err(|err| FitnessError::Request(err.to_string()))?;

        ensure_success(response)
            .await?
            .text()
            .await
            .map_err(|err| FitnessError::Payload(err.to_string()))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, FitnessError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(FitnessError::Status { status, body })
}

fn summary_from_value(activity: &Value) -> Option<ActivitySummary> {
    // Ids arrive as numbers from the search endpoint but are used as path segments.
    let activity_id = match activity.get("activityId")? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };

    Some(ActivitySummary {
        activity_id,
        activity_name: activity
            .get("activityName")
            .and_then(Value::as_str)
            .unwrap_or("Activity")
            .to_string(),
        start_time_local: activity
            .get("startTimeLocal")
            .and_then(Value::as_str)
            .map(str::to_string),
        distance: activity
            .get("distance")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        duration: activity
            .get("duration")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        activity_type: activity
            .get("activityType")
            .and_then(|t| t.get("typeKey").and_then(Value::as_str).or_else(|| t.as_str()))
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_ids_and_nested_type_key() {
        let summary = summary_from_value(&json!({
            "activityId": 17234567890u64,
            "activityName": "Morning hike",
            "startTimeLocal": "2026-06-01 08:00:00",
            "distance": 12034.5,
            "duration": 14400.0,
            "activityType": { "typeKey": "hiking", "typeId": 3 }
        }))
        .unwrap();

        assert_eq!(summary.activity_id, "17234567890");
        assert_eq!(summary.activity_name, "Morning hike");
        assert_eq!(summary.start_time_local.as_deref(), Some("2026-06-01 08:00:00"));
        assert_eq!(summary.distance, 12034.5);
        assert_eq!(summary.duration, 14400.0);
        assert_eq!(summary.activity_type.as_deref(), Some("hiking"));
    }

    #[test]
    fn string_ids_and_flat_type_with_defaults() {
        let summary = summary_from_value(&json!({
            "activityId": "abc-42",
            "activityType": "walking"
        }))
        .unwrap();

        assert_eq!(summary.activity_id, "abc-42");
        assert_eq!(summary.activity_name, "Activity");
        assert_eq!(summary.start_time_local, None);
        assert_eq!(summary.distance, 0.0);
        assert_eq!(summary.duration, 0.0);
        assert_eq!(summary.activity_type.as_deref(), Some("walking"));
    }

    #[test]
    fn missing_or_unusable_id_is_dropped() {
        assert!(summary_from_value(&json!({ "activityName": "No id" })).is_none());
        assert!(summary_from_value(&json!({ "activityId": [1, 2] })).is_none());
    }
}
