use std::sync::Arc;

use weather_core::{
    CancellationToken, CurrentWeather, Forecast, Measurements, WeatherCondition, WeatherRequest,
    WeatherService,
};

pub const DEFAULT_UNITS: &str = "metric";
pub const MAX_FORECAST_DAYS: u32 = 5;
/// The provider reports forecasts in 3-hour buckets.
pub const BUCKETS_PER_DAY: u32 = 8;

const SUPPORTED_UNITS: [&str; 3] = ["metric", "imperial", "standard"];

/// Either a fetched value or a message explaining why there is none.
pub type ToolOutcome<T> = Result<T, String>;

/// User-facing tool layer: validates input, calls the service, and renders
/// every outcome (including failures) as a message string.
#[derive(Debug, Clone)]
pub struct WeatherTools {
    service: Arc<dyn WeatherService>,
    cancel: CancellationToken,
}

impl WeatherTools {
    pub fn new(service: Arc<dyn WeatherService>, cancel: CancellationToken) -> Self {
        Self { service, cancel }
    }

    /// Gets current weather conditions for the specified city.
    pub async fn current_weather(&self, city: &str, country_code: Option<&str>, units: &str) -> String {
        match self.fetch_current(city, country_code, units).await {
            Ok(weather) => render_current(city, &weather),
            Err(message) => message,
        }
    }

    /// Gets the weather forecast for the specified city, `days` ahead.
    pub async fn forecast(
        &self,
        city: &str,
        country_code: Option<&str>,
        units: &str,
        days: u32,
    ) -> String {
        match self.fetch_forecast(city, country_code, units, days).await {
            Ok(forecast) => render_forecast(city, &forecast),
            Err(message) => message,
        }
    }

    pub async fn fetch_current(
        &self,
        city: &str,
        country_code: Option<&str>,
        units: &str,
    ) -> ToolOutcome<CurrentWeather> {
        let request = validated_request(city, country_code, units)?;

        self.service
            .get_weather(&request, &self.cancel)
            .await
            .map_err(|err| format!("Error retrieving weather data: {err}"))
    }

    pub async fn fetch_forecast(
        &self,
        city: &str,
        country_code: Option<&str>,
        units: &str,
        days: u32,
    ) -> ToolOutcome<Forecast> {
        let request = validated_request(city, country_code, units)?;
        if !(1..=MAX_FORECAST_DAYS).contains(&days) {
            return Err(format!("Days must be between 1 and {MAX_FORECAST_DAYS}."));
        }

        self.service
            .get_forecast(&request, days * BUCKETS_PER_DAY, &self.cancel)
            .await
            .map_err(|err| format!("Error retrieving daily forecast: {err}"))
    }
}

fn validated_request(city: &str, country_code: Option<&str>, units: &str) -> ToolOutcome<WeatherRequest> {
    if city.trim().is_empty() {
        return Err("City name must not be empty.".to_string());
    }
    if !SUPPORTED_UNITS.contains(&units) {
        return Err("Invalid units specified. Use 'metric', 'imperial', or 'standard'.".to_string());
    }

    let mut request = WeatherRequest::new(city).with_units(units);
    request.country_code = country_code.map(str::to_owned);
    Ok(request)
}

fn condition(conditions: &[WeatherCondition]) -> &str {
    conditions.first().map_or("N/A", |c| c.description.as_str())
}

fn reading(conditions: &[WeatherCondition], m: &Measurements) -> String {
    format!(
        "Condition: {}\n\
         Temperature:\n\tMin: {}\n\tMax: {}\n\tFeels like: {}\n\
         Humidity: {}%\n\
         Pressure: {} hPa\n",
        condition(conditions),
        m.temp_min,
        m.temp_max,
        m.feels_like,
        m.humidity,
        m.pressure,
    )
}

pub fn render_current(city: &str, weather: &CurrentWeather) -> String {
    format!("Current weather in {city}:\n{}", reading(&weather.conditions, &weather.measurements))
}

pub fn render_forecast(city: &str, forecast: &Forecast) -> String {
    let mut out = format!("Daily forecast for {city}:\n");
    for entry in &forecast.entries {
        out.push_str(&format!(
            "Date: {}\n{}\n",
            entry.timestamp,
            reading(&entry.conditions, &entry.measurements)
        ));
    }
    out
}
