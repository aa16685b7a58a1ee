use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Forecast conditions assigned to one route point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Celsius
    pub temperature: f64,
    /// mm
    pub precipitation: f64,
    /// km/h
    pub wind_speed: f64,
    /// degrees
    pub wind_direction: f64,
    /// cm
    pub snow_depth: f64,
    pub weather_code: i32,
    pub description: String,
}

/// Hourly forecast series for one location, as parallel arrays.
#[derive(Debug, Clone, Default)]
pub struct HourlyForecast {
    pub times: Vec<DateTime<Utc>>,
    pub temperature: Vec<Option<f64>>,
    pub precipitation: Vec<Option<f64>>,
    pub wind_speed: Vec<Option<f64>>,
    pub wind_direction: Vec<Option<f64>>,
    pub snow_depth: Vec<Option<f64>>,
    pub weather_code: Vec<Option<i32>>,
}

impl HourlyForecast {
    /// Reads the hour at `index`. Any missing required field yields `None`;
    /// a missing snow depth reads as bare ground.
    pub fn sample_at(&self, index: usize) -> Option<WeatherSample> {
        fn at(series: &[Option<f64>], index: usize) -> Option<f64> {
            series.get(index).copied().flatten()
        }

        let weather_code = self.weather_code.get(index).copied().flatten()?;
        Some(WeatherSample {
            temperature: at(&self.temperature, index)?,
            precipitation: at(&self.precipitation, index)?,
            wind_speed: at(&self.wind_speed, index)?,
            wind_direction: at(&self.wind_direction, index)?,
            snow_depth: at(&self.snow_depth, index).unwrap_or(0.0).max(0.0),
            weather_code,
            description: describe_weather_code(weather_code).to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_range: Option<TempRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wind: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_precipitation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_snow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_rain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
}

impl WeatherSummary {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            temp_range: None,
            max_wind: None,
            total_precipitation: None,
            has_snow: None,
            has_rain: None,
            conditions: None,
        }
    }
}

/// WMO weather interpretation code to a short description.
pub fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
