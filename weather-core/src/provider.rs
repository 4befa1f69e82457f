use crate::{
    Config, CurrentWeather, Forecast, WeatherRequest,
    error::Result,
    provider::openweather::OpenWeatherService,
    transport::HttpTransport,
};
use async_trait::async_trait;
use std::fmt::Debug;
use tokio_util::sync::CancellationToken;

pub mod openweather;

/// The two read-only lookups exposed to the tool layer.
#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    async fn get_weather(
        &self,
        request: &WeatherRequest,
        cancel: &CancellationToken,
    ) -> Result<CurrentWeather>;

    /// `count` is the number of 3-hour buckets, passed through unchecked.
    async fn get_forecast(
        &self,
        request: &WeatherRequest,
        count: u32,
        cancel: &CancellationToken,
    ) -> Result<Forecast>;
}

/// Construct the OpenWeather-backed service from config.
pub fn service_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherService>> {
    config.openweather.api_key()?;

    let transport = HttpTransport::new(config.http.timeout())?;
    let service = OpenWeatherService::new(transport, config.openweather.clone());

    Ok(Box::new(service))
}
