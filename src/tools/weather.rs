//! Weather adapter: Open-Meteo forecast keyed by Nominatim geocoding
//!
//! Both services are public and keyless. Geocoding results are memoized in a
//! bounded LRU cache keyed by the exact input string for the process lifetime.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{FailureKind, Tool, ToolDescriptor, ToolReply};
use crate::{Error, Result};

/// Capacity of the geocoding memoization cache
const GEOCODE_CACHE_CAPACITY: usize = 100;

const GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);
const FORECAST_TIMEOUT: Duration = Duration::from_secs(15);

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
const USER_AGENT: &str = "friday-weather-agent";

/// A resolved place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

/// Current conditions as reported by the forecast API
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CurrentWeather {
    /// Temperature in °C
    pub temperature: f64,
    /// Wind speed in m/s
    pub windspeed: f64,
    /// Wind direction in degrees
    pub winddirection: f64,
    /// WMO weather interpretation code
    pub weathercode: i64,
}

/// Human description for a WMO weather code.
///
/// Unknown codes render as `Unknown (code: N)` rather than failing.
#[must_use]
pub fn weather_description(code: i64) -> String {
    let known = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => return format!("Unknown (code: {code})"),
    };

    known.to_string()
}

/// Backing weather services: geocoding plus current-conditions lookup
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Resolve a free-text place name to coordinates.
    ///
    /// Returns `Ok(None)` when the geocoder has no match.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decoding failure.
    async fn geocode(&self, address: &str) -> Result<Option<GeoLocation>>;

    /// Fetch current conditions for a location.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or decoding failure.
    async fn current_weather(&self, location: GeoLocation) -> Result<CurrentWeather>;
}

/// Production backend: Nominatim + Open-Meteo over HTTP
pub struct OpenMeteoApi {
    client: reqwest::Client,
}

impl OpenMeteoApi {
    /// Create the backend with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client })
    }
}

/// One geocoder match; Nominatim serializes coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Forecast API envelope
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[async_trait]
impl WeatherApi for OpenMeteoApi {
    async fn geocode(&self, address: &str) -> Result<Option<GeoLocation>> {
        let response = self
            .client
            .get(NOMINATIM_URL)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .timeout(GEOCODE_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let places: Vec<NominatimPlace> = response.json().await?;
        let Some(place) = places.first() else {
            return Ok(None);
        };

        let parsed = place
            .lat
            .parse::<f64>()
            .and_then(|lat| place.lon.parse::<f64>().map(|lon| GeoLocation { lat, lon }));

        parsed.map(Some).map_err(|e| {
            Error::Tool(format!("geocoder returned unparseable coordinates: {e}"))
        })
    }

    async fn current_weather(&self, location: GeoLocation) -> Result<CurrentWeather> {
        let response = self
            .client
            .get(OPEN_METEO_URL)
            .query(&[
                ("latitude", location.lat.to_string()),
                ("longitude", location.lon.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .timeout(FORECAST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let forecast: ForecastResponse = response.json().await?;
        Ok(forecast.current_weather)
    }
}

/// Weather adapter exposed to the session as `get_weather`
pub struct WeatherTool {
    api: Arc<dyn WeatherApi>,
    cache: Mutex<LruCache<String, GeoLocation>>,
}

impl WeatherTool {
    /// Create the adapter over a backend
    #[must_use]
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        let capacity =
            NonZeroUsize::new(GEOCODE_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);

        Self {
            api,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Resolve a city through the cache, hitting the geocoder on a miss.
    ///
    /// Cache keys are the exact input string, no normalization; entries only
    /// leave by capacity eviction.
    async fn locate(&self, city: &str) -> Result<Option<GeoLocation>> {
        if let Some(loc) = self.cache.lock().await.get(city).copied() {
            tracing::debug!(city, "geocode cache hit");
            return Ok(Some(loc));
        }

        let resolved = self.api.geocode(city).await?;
        if let Some(loc) = resolved {
            self.cache.lock().await.put(city.to_string(), loc);
        }

        Ok(resolved)
    }

    async fn report(&self, city: &str) -> ToolReply {
        let location = match self.locate(city).await {
            Ok(Some(loc)) => loc,
            Ok(None) => {
                return ToolReply::failure(
                    FailureKind::NotFound,
                    format!(
                        "Could not find location: {city}. Please check the spelling or try a different city name."
                    ),
                );
            }
            Err(e) => {
                tracing::error!(city, error = %e, "geocoding failed");
                return ToolReply::failure(
                    FailureKind::NotFound,
                    format!(
                        "Could not find location: {city}. Please check the spelling or try a different city name."
                    ),
                );
            }
        };

        match self.api.current_weather(location).await {
            Ok(current) => {
                let description = weather_description(current.weathercode);
                let temperature = current.temperature;
                let windspeed = current.windspeed;
                let winddirection = current.winddirection;

                ToolReply::Success(format!(
                    "Weather in {city}: {description}, {temperature:.1}°C, wind {windspeed:.1} m/s at {winddirection:.0}°"
                ))
            }
            Err(Error::Http(e)) if e.is_timeout() => ToolReply::failure(
                FailureKind::Timeout,
                format!("Weather service timeout for {city}. Please try again."),
            ),
            Err(Error::Http(e)) if e.is_status() => {
                tracing::error!(city, error = %e, "weather service returned an error");
                ToolReply::failure(
                    FailureKind::Upstream,
                    format!("Weather service error for {city}. Please try again later."),
                )
            }
            Err(e) => {
                tracing::error!(city, error = %e, "unexpected error fetching weather");
                ToolReply::failure(
                    FailureKind::Internal,
                    format!("Could not retrieve weather for {city}. Please try again."),
                )
            }
        }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_weather",
            description: "Get the current weather for a given city",
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "The city name to get weather for"
                    }
                },
                "required": ["city"]
            }),
        }
    }

    async fn invoke(&self, args: serde_json::Value) -> ToolReply {
        let Some(city) = args.get("city").and_then(|v| v.as_str()) else {
            return ToolReply::failure(
                FailureKind::InvalidInput,
                "Missing 'city' parameter for the weather lookup.",
            );
        };

        self.report(city).await
    }
}
