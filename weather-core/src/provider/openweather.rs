use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::{
    config::OpenWeatherConfig,
    error::{Error, Result, TransportError},
    model::{Coordinates, CurrentWeather, Forecast, WeatherRequest},
    transport::{HttpRequest, Transport, redact},
};

use super::WeatherService;

/// Everything but the RFC 3986 unreserved characters gets escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Resolves a city to coordinates, then queries the weather or forecast
/// endpoint for them. The two calls always run in that order; a failure in
/// the first one means the second is never issued.
#[derive(Debug, Clone)]
pub struct OpenWeatherService<T> {
    transport: T,
    settings: OpenWeatherConfig,
}

impl<T: Transport> OpenWeatherService<T> {
    pub fn new(transport: T, settings: OpenWeatherConfig) -> Self {
        Self { transport, settings }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Step 1: the provider's best match for the city, first entry wins.
    async fn resolve(
        &self,
        request: &WeatherRequest,
        cancel: &CancellationToken,
    ) -> Result<Coordinates> {
        tracing::info!(
            city = %request.city,
            country = ?request.country_code,
            "resolving city to coordinates"
        );

        let url = geocode_url(&self.settings, request);
        let candidates: Option<Vec<Coordinates>> = self.fetch(url, cancel).await?;

        match candidates.and_then(|c| c.into_iter().next()) {
            Some(coords) => {
                tracing::info!(city = %request.city, lat = coords.latitude, lon = coords.longitude, "geocode resolved");
                Ok(coords)
            }
            None => {
                tracing::error!(city = %request.city, "no geocode found");
                Err(Error::CityNotFound(request.city.clone()))
            }
        }
    }

    async fn fetch<R>(&self, url: String, cancel: &CancellationToken) -> Result<Option<R>>
    where
        R: DeserializeOwned + Send + 'static,
    {
        tracing::info!(url = %redact(&url), "requesting provider data");
        self.transport.send(HttpRequest::get(url), cancel).await
    }
}

#[async_trait]
impl<T: Transport> WeatherService for OpenWeatherService<T> {
    async fn get_weather(
        &self,
        request: &WeatherRequest,
        cancel: &CancellationToken,
    ) -> Result<CurrentWeather> {
        tracing::info!(city = %request.city, units = ?request.units, "getting current weather");

        let coords = self.resolve(request, cancel).await?;
        ensure_not_cancelled(cancel)?;

        let url = weather_url(&self.settings, coords, request.units.as_deref());
        let weather = self.fetch::<CurrentWeather>(url, cancel).await?.ok_or_else(|| {
            tracing::error!(city = %request.city, "weather data unavailable");
            Error::WeatherUnavailable(request.city.clone())
        })?;

        tracing::info!(city = %request.city, "weather data retrieved");
        Ok(weather)
    }

    async fn get_forecast(
        &self,
        request: &WeatherRequest,
        count: u32,
        cancel: &CancellationToken,
    ) -> Result<Forecast> {
        tracing::info!(city = %request.city, units = ?request.units, count, "getting forecast");

        let coords = self.resolve(request, cancel).await?;
        ensure_not_cancelled(cancel)?;

        let url = forecast_url(&self.settings, coords, count, request.units.as_deref());
        let forecast = self.fetch::<Forecast>(url, cancel).await?.ok_or_else(|| {
            tracing::error!(city = %request.city, "forecast unavailable");
            Error::ForecastUnavailable(request.city.clone())
        })?;

        tracing::info!(city = %request.city, entries = forecast.entries.len(), "forecast retrieved");
        Ok(forecast)
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(TransportError::Cancelled.into());
    }
    Ok(())
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn endpoint(settings: &OpenWeatherConfig, path: &str) -> String {
    let key = settings.api_key.as_deref().unwrap_or_default();
    format!("{}{}?appid={}", settings.base_uri, path, key)
}

fn with_units(mut url: String, units: Option<&str>) -> String {
    if let Some(units) = non_empty(units) {
        url.push_str("&units=");
        url.push_str(&encode(units));
    }
    url
}

/// `{base}{geocode}?appid={key}&limit=1&q={city}[,{country}]`
pub fn geocode_url(settings: &OpenWeatherConfig, request: &WeatherRequest) -> String {
    let mut url = endpoint(settings, &settings.endpoints.geocode);
    url.push_str("&limit=1&q=");
    url.push_str(&encode(&request.city));
    if let Some(country) = non_empty(request.country_code.as_deref()) {
        url.push(',');
        url.push_str(&encode(country));
    }
    url
}

/// `{base}{weather}?appid={key}&lat={lat}&lon={lon}[&units={units}]`
pub fn weather_url(settings: &OpenWeatherConfig, coords: Coordinates, units: Option<&str>) -> String {
    let url = format!(
        "{}&lat={}&lon={}",
        endpoint(settings, &settings.endpoints.weather),
        coords.latitude,
        coords.longitude
    );
    with_units(url, units)
}

/// `{base}{forecast}?appid={key}&lat={lat}&lon={lon}&cnt={count}[&units={units}]`
pub fn forecast_url(
    settings: &OpenWeatherConfig,
    coords: Coordinates,
    count: u32,
    units: Option<&str>,
) -> String {
    let url = format!(
        "{}&lat={}&lon={}&cnt={}",
        endpoint(settings, &settings.endpoints.forecast),
        coords.latitude,
        coords.longitude,
        count
    );
    with_units(url, units)
}
