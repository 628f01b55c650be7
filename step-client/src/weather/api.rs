//! weatherapi.com client.

use super::{WeatherError, WeatherSource};
use crate::config::WeatherConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
}

/// Client for the weatherapi.com `current.json` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    base_url: String,
    api_key: String,
    location: String,
    http: reqwest::Client,
}

impl WeatherApiClient {
    /// Create a client from configuration.
    ///
    /// Fails with [`WeatherError::MissingApiKey`] when no key is set.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(WeatherError::MissingApiKey)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            location: config.location.clone(),
            http,
        })
    }

    /// URL of the current-conditions endpoint.
    pub fn current_url(&self) -> String {
        format!("{}/v1/current.json", self.base_url)
    }
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    async fn temperature_c(&self) -> Result<f64, WeatherError> {
        let response = self
            .http
            .get(self.current_url())
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", self.location.as_str()),
                ("aqi", "no"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body: CurrentResponse = response.json().await?;
        Ok(body.current.temp_c)
    }
}
