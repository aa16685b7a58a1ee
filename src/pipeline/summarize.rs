use std::collections::BTreeSet;

use crate::types::weather::{TempRange, WeatherSample, WeatherSummary};

/// Trip-level aggregates over the available per-point samples.
pub fn summarize(samples: &[Option<WeatherSample>]) -> WeatherSummary {
    let valid: Vec<&WeatherSample> = samples.iter().flatten().collect();
    let Some(first) = valid.first() else {
        return WeatherSummary::unavailable();
    };

    let mut temp_range = TempRange {
        min: first.temperature,
        max: first.temperature,
    };
    let mut max_wind = first.wind_speed;
    let mut total_precipitation = 0.0;
    let mut conditions = BTreeSet::new();

    for sample in &valid {
        temp_range.min = temp_range.min.min(sample.temperature);
        temp_range.max = temp_range.max.max(sample.temperature);
        max_wind = max_wind.max(sample.wind_speed);
        total_precipitation += sample.precipitation;
        conditions.insert(sample.description.clone());
    }

    WeatherSummary {
        available: true,
        temp_range: Some(temp_range),
        max_wind: Some(max_wind),
        total_precipitation: Some(total_precipitation),
        has_snow: Some(valid.iter().any(|s| s.snow_depth > 0.0)),
        has_rain: Some(valid.iter().any(|s| s.precipitation > 0.0)),
        conditions: Some(conditions.into_iter().collect()),
    }
}
