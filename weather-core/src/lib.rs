//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - A generic HTTP [`Transport`] with a single error channel
//! - The geocode-then-fetch orchestration behind [`WeatherService`]
//! - Domain models deserialized from OpenWeather responses
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod transport;

pub use config::{Config, Endpoints, HttpConfig, LoggingConfig, OpenWeatherConfig};
pub use error::{Error, Result, TransportError};
pub use model::{
    Coordinates, CurrentWeather, Forecast, ForecastEntry, Measurements, WeatherCondition,
    WeatherRequest,
};
pub use reqwest::{Method, StatusCode};
pub use provider::{WeatherService, openweather::OpenWeatherService, service_from_config};
pub use tokio_util::sync::CancellationToken;
pub use transport::{HttpRequest, HttpTransport, Transport};
