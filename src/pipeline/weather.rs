//! Weather overlay: stretches a physics-timed route by forecast conditions.
//!
//! Only a handful of points are looked up. Every other point takes the
//! sample of the nearest *preceding* sampled point; there is no spatial or
//! temporal interpolation between samples.

use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};

use crate::clients::ForecastProvider;
use crate::config::WeatherConfig;
use crate::error::{RouteError, WeatherError};
use crate::types::route::Route;
use crate::types::weather::{HourlyForecast, WeatherSample};

#[derive(Debug, Clone)]
pub struct WeatherOverlay {
    pub route: Route,
    /// One entry per route point, `None` where no forecast was available.
    pub samples: Vec<Option<WeatherSample>>,
}

pub async fn apply_weather<P: ForecastProvider>(
    route: Route,
    start_time: DateTime<Utc>,
    provider: &P,
    config: &WeatherConfig,
) -> Result<WeatherOverlay, RouteError> {
    if route.points.is_empty() {
        return Err(RouteError::EmptyRoute);
    }

    let stride = sample_stride(route.points.len(), config.max_samples);
    let sampled = fetch_samples(&route, stride, start_time, provider, config).await;
    let found = sampled.iter().filter(|s| s.is_some()).count();
    tracing::debug!(
        "Weather lookups complete: {}/{} samples (stride {})",
        found,
        sampled.len(),
        stride
    );

    let samples = backfill_from_preceding(&sampled, route.points.len(), stride);
    let route = reintegrate(route, &samples);

    Ok(WeatherOverlay { route, samples })
}

/// Distance in points between forecast lookups.
pub fn sample_stride(point_count: usize, max_samples: usize) -> usize {
    (point_count / max_samples.max(1)).max(1)
}

/// Looks up the forecast at every `stride`-th point, concurrently but
/// yielding results in point order. Failed or timed-out lookups are `None`.
async fn fetch_samples<P: ForecastProvider>(
    route: &Route,
    stride: usize,
    start_time: DateTime<Utc>,
    provider: &P,
    config: &WeatherConfig,
) -> Vec<Option<WeatherSample>> {
    let timeout = config.timeout;
    // Owned targets, so the lookup futures hold no borrow of the route.
    let targets: Vec<(usize, f64, f64, DateTime<Utc>)> = route
        .points
        .iter()
        .enumerate()
        .step_by(stride)
        .map(|(index, point)| {
            (
                index,
                point.lat,
                point.lon,
                arrival_time(start_time, point.estimated_time),
            )
        })
        .collect();

    let lookups = targets
        .into_iter()
        .map(|(index, lat, lon, arrival)| {
            async move {
                let result = match tokio::time::timeout(timeout, provider.hourly_forecast(lat, lon))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(WeatherError::Timeout(timeout)),
                };

                match result {
                    Ok(forecast) => sample_for_arrival(&forecast, arrival),
                    Err(err) => {
                        tracing::warn!("Weather fetch error at point {}: {}", index, err);
                        None
                    }
                }
            }
        });

    stream::iter(lookups)
        .buffered(config.concurrency.max(1))
        .collect()
        .await
}

fn arrival_time(start_time: DateTime<Utc>, estimated_seconds: f64) -> DateTime<Utc> {
    Duration::try_milliseconds((estimated_seconds * 1000.0) as i64)
        .and_then(|offset| start_time.checked_add_signed(offset))
        .unwrap_or(start_time)
}

/// Index of the first forecast hour at or after `arrival`.
///
/// An arrival beyond the forecast window falls back to the first hour, so
/// the returned hour can be stale. `None` only for an empty series.
pub fn select_forecast_hour(times: &[DateTime<Utc>], arrival: DateTime<Utc>) -> Option<usize> {
    if times.is_empty() {
        return None;
    }
    match times.iter().position(|t| *t >= arrival) {
        Some(index) => Some(index),
        None => {
            tracing::debug!("Arrival {} is outside the forecast window, using first hour", arrival);
            Some(0)
        }
    }
}

fn sample_for_arrival(forecast: &HourlyForecast, arrival: DateTime<Utc>) -> Option<WeatherSample> {
    let index = select_forecast_hour(&forecast.times, arrival)?;
    let sample = forecast.sample_at(index);
    if sample.is_none() {
        tracing::warn!("Forecast hour {} is missing required fields", index);
    }
    sample
}

/// Assigns each point the sample of the nearest preceding sampled point,
/// i.e. `sampled[i / stride]`, clamped to the last sample.
pub fn backfill_from_preceding(
    sampled: &[Option<WeatherSample>],
    point_count: usize,
    stride: usize,
) -> Vec<Option<WeatherSample>> {
    let Some(last) = sampled.len().checked_sub(1) else {
        return vec![None; point_count];
    };
    (0..point_count)
        .map(|i| sampled[(i / stride.max(1)).min(last)].clone())
        .collect()
}

/// Multiplier on segment duration for the given conditions; 1.0 without a sample.
pub fn weather_factor(sample: Option<&WeatherSample>) -> f64 {
    let Some(weather) = sample else {
        return 1.0;
    };

    let mut factor = 1.0;

    // Wind, taken as headwind.
    if weather.wind_speed > 50.0 {
        factor *= 1.4;
    } else if weather.wind_speed > 30.0 {
        factor *= 1.2;
    } else if weather.wind_speed > 15.0 {
        factor *= 1.1;
    }

    if weather.precipitation > 5.0 {
        factor *= 1.3;
    } else if weather.precipitation > 1.0 {
        factor *= 1.15;
    }

    if weather.snow_depth > 30.0 {
        factor *= 2.0;
    } else if weather.snow_depth > 10.0 {
        factor *= 1.5;
    } else if weather.snow_depth > 0.0 {
        factor *= 1.2;
    }

    if weather.temperature < -10.0 {
        factor *= 1.3;
    } else if weather.temperature < 0.0 {
        factor *= 1.1;
    } else if weather.temperature > 30.0 {
        factor *= 1.15;
    }

    factor
}

/// Second timing pass: each segment's physics duration is scaled by the
/// weather factor of the point ending it.
pub fn reintegrate(mut route: Route, samples: &[Option<WeatherSample>]) -> Route {
    let mut added = 0.0;
    let mut prev_physics_time = 0.0;

    for (i, point) in route.points.iter_mut().enumerate() {
        let factor = weather_factor(samples.get(i).and_then(Option::as_ref));
        let physics_time = point.estimated_time;

        if i > 0 {
            added += (physics_time - prev_physics_time) * (factor - 1.0);
        }

        point.weather_factor = factor;
        point.estimated_time = physics_time + added;
        prev_physics_time = physics_time;
    }

    route
}
