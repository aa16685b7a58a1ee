use std::sync::Arc;

use crate::clients::garmin::GarminClient;
use crate::clients::open_meteo::OpenMeteoClient;
use crate::config::Config;

/// Shared, read-only handles. No request data is kept between requests.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    weather: OpenMeteoClient,
    garmin: GarminClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        Self {
            weather: OpenMeteoClient::new(http.clone(), &config.weather),
            garmin: GarminClient::new(http, config.garmin_api_url.clone()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn weather(&self) -> &OpenMeteoClient {
        &self.weather
    }

    pub fn garmin(&self) -> &GarminClient {
        &self.garmin
    }
}
