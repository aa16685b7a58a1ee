pub mod garmin;
pub mod open_meteo;

use std::future::Future;

use crate::error::WeatherError;
use crate::types::weather::HourlyForecast;

/// Source of hourly forecasts keyed by location.
pub trait ForecastProvider: Sync {
    fn hourly_forecast(
        &self,
        lat: f64,
        lon: f64,
    ) -> impl Future<Output = Result<HourlyForecast, WeatherError>> + Send;
}
