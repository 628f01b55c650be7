//! Weather lookup used to pick the piece's starting color.
//!
//! The lookup runs once at startup. Any failure falls back to white; the
//! weather never blocks or fails startup.

mod api;

pub use api::WeatherApiClient;

use async_trait::async_trait;
use thiserror::Error;
use twostep_core::color_for_temperature;
use twostep_types::Color;

/// Weather lookup errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Lookup is enabled but no API key is configured.
    #[error("no weather API key configured")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("http error: {0}")]
    Http(String),

    /// The API answered with an error status.
    #[error("weather API error ({0})")]
    Status(u16),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Http(e.to_string())
    }
}

/// Source of the current temperature.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current temperature in °C.
    async fn temperature_c(&self) -> Result<f64, WeatherError>;
}

/// Fixed temperature, for tests and offline runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWeather(pub f64);

#[async_trait]
impl WeatherSource for FixedWeather {
    async fn temperature_c(&self) -> Result<f64, WeatherError> {
        Ok(self.0)
    }
}

/// Starting color for the current weather, white if the lookup fails.
pub async fn initial_color<W: WeatherSource + ?Sized>(source: &W) -> Color {
    match source.temperature_c().await {
        Ok(celsius) => {
            let color = color_for_temperature(celsius);
            tracing::debug!("Weather: {:.1}°C -> {}", celsius, color);
            color
        }
        Err(e) => {
            tracing::warn!("Weather lookup failed, keeping white: {}", e);
            Color::White
        }
    }
}
