use std::time::Duration;

use crate::types::route::PhysicsConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_file_size: usize,
    pub physics: PhysicsConfig,
    pub weather: WeatherConfig,
    pub garmin_api_url: String,
    pub garmin_activity_limit: u32,
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_url: String,
    pub forecast_days: u8,
    /// Upper bound on forecast lookups per route; the stride is `len / max_samples`.
    pub max_samples: usize,
    pub timeout: Duration,
    pub concurrency: usize,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            forecast_days: 3,
            max_samples: 10,
            timeout: Duration::from_secs(10),
            concurrency: 4,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let port = env_or("PORT", 5000);
        let max_file_size_mb: usize = env_or("MAX_FILE_SIZE_MB", 25);

        let defaults = PhysicsConfig::default();
        let physics = PhysicsConfig {
            base_speed_kmh: env_or("BASE_SPEED_KMH", defaults.base_speed_kmh),
            naismith_minutes_per_100m: env_or(
                "NAISMITH_MINUTES_PER_100M",
                defaults.naismith_minutes_per_100m,
            ),
        };

        let weather_defaults = WeatherConfig::default();
        let weather = WeatherConfig {
            api_url: std::env::var("WEATHER_API_URL").unwrap_or(weather_defaults.api_url),
            forecast_days: env_or("WEATHER_FORECAST_DAYS", weather_defaults.forecast_days),
            max_samples: env_or("WEATHER_MAX_SAMPLES", weather_defaults.max_samples).max(1),
            timeout: Duration::from_secs(env_or("WEATHER_TIMEOUT_SECONDS", 10)),
            concurrency: env_or("WEATHER_CONCURRENCY", weather_defaults.concurrency).max(1),
        };

        let garmin_api_url = std::env::var("GARMIN_API_URL")
            .unwrap_or_else(|_| "https://connectapi.garmin.com".to_string());
        let garmin_activity_limit = env_or("GARMIN_ACTIVITY_LIMIT", 50);

        Self {
            port,
            max_file_size: max_file_size_mb * 1024 * 1024,
            physics,
            weather,
            garmin_api_url,
            garmin_activity_limit,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
