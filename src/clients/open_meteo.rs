use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::clients::ForecastProvider;
use crate::config::WeatherConfig;
use crate::error::WeatherError;
use crate::types::weather::HourlyForecast;

const HOURLY_FIELDS: &str =
    "temperature_2m,precipitation,wind_speed_10m,wind_direction_10m,snow_depth,weather_code";

/// Open-Meteo forecast API client.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
    forecast_days: u8,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyPayload,
}

#[derive(Debug, Deserialize)]
struct HourlyPayload {
    /// Unix seconds, requested with `timeformat=unixtime`.
    #[serde(default)]
    time: Vec<i64>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    wind_direction_10m: Vec<Option<f64>>,
    /// Metres.
    #[serde(default)]
    snow_depth: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Option<i32>>,
}

impl OpenMeteoClient {
    pub fn new(client: reqwest::Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.clone(),
            forecast_days: config.forecast_days,
        }
    }

    async fn fetch(&self, lat: f64, lon: f64) -> Result<HourlyForecast, WeatherError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("forecast_days", self.forecast_days.to_string()),
                ("timezone", "auto".to_string()),
                ("timeformat", "unixtime".to_string()),
            ])
            .send()
            .await
            .map_err(|err| WeatherError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let payload: ForecastResponse = response
            .json()
            .await
            .map_err(|err| WeatherError::Payload(err.to_string()))?;

        into_forecast(payload)
    }
}

impl ForecastProvider for OpenMeteoClient {
    async fn hourly_forecast(&self, lat: f64, lon: f64) -> Result<HourlyForecast, WeatherError> {
        self.fetch(lat, lon).await
    }
}

fn into_forecast(payload: ForecastResponse) -> Result<HourlyForecast, WeatherError> {
    let hourly = payload.hourly;
    let times = hourly
        .time
        .iter()
        .map(|&secs| {
            DateTime::<Utc>::from_timestamp(secs, 0)
                .ok_or_else(|| WeatherError::Payload(format!("hour {} out of range", secs)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HourlyForecast {
        times,
        temperature: hourly.temperature_2m,
        precipitation: hourly.precipitation,
        wind_speed: hourly.wind_speed_10m,
        wind_direction: hourly.wind_direction_10m,
        snow_depth: hourly
            .snow_depth
            .into_iter()
            .map(|depth| depth.map(|m| m * 100.0))
            .collect(),
        weather_code: hourly.weather_code,
    })
}
