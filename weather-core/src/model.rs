use serde::{Deserialize, Serialize};

/// Caller-supplied options shared by the current-weather and forecast lookups.
///
/// Values are forwarded verbatim; validating units or country codes is the
/// caller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherRequest {
    pub city: String,
    pub country_code: Option<String>,
    pub units: Option<String>,
}

impl WeatherRequest {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into(), ..Self::default() }
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherCondition {
    pub id: i32,
    /// Group of weather parameters (Rain, Snow, Clouds, ...).
    #[serde(rename = "main")]
    pub group: String,
    pub description: String,
}

/// Temperature, pressure (hPa) and humidity (%) for a single reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurements {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i32,
    pub humidity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sea_level: Option<i32>,
    #[serde(rename = "grnd_level", skip_serializing_if = "Option::is_none")]
    pub ground_level: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentWeather {
    #[serde(rename = "weather")]
    pub conditions: Vec<WeatherCondition>,
    #[serde(rename = "main")]
    pub measurements: Measurements,
    #[serde(rename = "coord")]
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastEntry {
    /// Provider-formatted time of the 3-hour bucket, e.g. `2024-05-01 12:00:00`.
    #[serde(rename = "dt_txt")]
    pub timestamp: String,
    #[serde(rename = "main")]
    pub measurements: Measurements,
    #[serde(rename = "weather")]
    pub conditions: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Forecast {
    #[serde(rename = "list")]
    pub entries: Vec<ForecastEntry>,
}
