//! Adapter behavior tests with mocked backends
//!
//! Every adapter must resolve to a renderable string; these tests pin the
//! exact user-facing messages and the geocode cache discipline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use friday_agent::tools::weather::{CurrentWeather, GeoLocation, WeatherApi, WeatherTool};
use friday_agent::tools::{FailureKind, SearchBackend, SearchTool, Tool};
use friday_agent::{Error, Result};

/// Weather backend with scripted responses and call counters
struct FakeWeatherApi {
    location: Option<GeoLocation>,
    weather: Result<CurrentWeather>,
    geocode_calls: AtomicUsize,
}

impl FakeWeatherApi {
    fn new(location: Option<GeoLocation>, weather: Result<CurrentWeather>) -> Self {
        Self {
            location,
            weather,
            geocode_calls: AtomicUsize::new(0),
        }
    }

    fn found(weather: CurrentWeather) -> Self {
        Self::new(Some(GeoLocation { lat: 51.5, lon: -0.1 }), Ok(weather))
    }
}

#[async_trait]
impl WeatherApi for FakeWeatherApi {
    async fn geocode(&self, _address: &str) -> Result<Option<GeoLocation>> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.location)
    }

    async fn current_weather(&self, _location: GeoLocation) -> Result<CurrentWeather> {
        match &self.weather {
            Ok(w) => Ok(*w),
            Err(_) => Err(Error::Tool("weather backend down".to_string())),
        }
    }
}

fn overcast() -> CurrentWeather {
    CurrentWeather {
        temperature: 15.0,
        windspeed: 5.0,
        winddirection: 180.0,
        weathercode: 3,
    }
}

#[tokio::test]
async fn unknown_city_yields_not_found_message() {
    let tool = WeatherTool::new(Arc::new(FakeWeatherApi::new(None, Ok(overcast()))));

    let reply = tool
        .invoke(serde_json::json!({ "city": "Nowhereville-xyz123" }))
        .await;

    assert_eq!(reply.failure_kind(), Some(FailureKind::NotFound));
    assert_eq!(
        reply.into_text(),
        "Could not find location: Nowhereville-xyz123. Please check the spelling or try a different city name."
    );
}

#[tokio::test]
async fn known_city_renders_description_and_readings() {
    let tool = WeatherTool::new(Arc::new(FakeWeatherApi::found(overcast())));

    let text = tool
        .invoke(serde_json::json!({ "city": "London" }))
        .await
        .into_text();

    assert!(text.contains("Overcast"), "missing description: {text}");
    assert!(text.contains("15.0"), "missing temperature: {text}");
    assert!(text.contains("5.0"), "missing wind speed: {text}");
    assert!(text.contains("180"), "missing wind direction: {text}");
}

#[tokio::test]
async fn weather_backend_failure_is_a_handled_string() {
    let api = FakeWeatherApi::new(
        Some(GeoLocation { lat: 0.0, lon: 0.0 }),
        Err(Error::Tool("down".to_string())),
    );
    let tool = WeatherTool::new(Arc::new(api));

    let reply = tool.invoke(serde_json::json!({ "city": "London" })).await;

    assert_eq!(reply.failure_kind(), Some(FailureKind::Internal));
    assert_eq!(
        reply.into_text(),
        "Could not retrieve weather for London. Please try again."
    );
}

#[tokio::test]
async fn missing_city_parameter_is_invalid_input() {
    let tool = WeatherTool::new(Arc::new(FakeWeatherApi::found(overcast())));
    let reply = tool.invoke(serde_json::json!({})).await;
    assert_eq!(reply.failure_kind(), Some(FailureKind::InvalidInput));
}

#[tokio::test]
async fn repeated_city_is_served_from_cache() {
    let api = Arc::new(FakeWeatherApi::found(overcast()));
    let tool = WeatherTool::new(Arc::clone(&api) as Arc<dyn WeatherApi>);

    let _ = tool.invoke(serde_json::json!({ "city": "London" })).await;
    let _ = tool.invoke(serde_json::json!({ "city": "London" })).await;

    assert_eq!(api.geocode_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn distinct_cities_each_hit_the_geocoder() {
    let api = Arc::new(FakeWeatherApi::found(overcast()));
    let tool = WeatherTool::new(Arc::clone(&api) as Arc<dyn WeatherApi>);

    let _ = tool.invoke(serde_json::json!({ "city": "London" })).await;
    let _ = tool.invoke(serde_json::json!({ "city": "Paris" })).await;

    assert_eq!(api.geocode_calls.load(Ordering::SeqCst), 2);
}

/// Search backend returning a fixed payload or an error
struct FakeSearch {
    payload: Result<String>,
}

#[async_trait]
impl SearchBackend for FakeSearch {
    async fn run(&self, _query: &str) -> Result<String> {
        match &self.payload {
            Ok(text) => Ok(text.clone()),
            Err(_) => Err(Error::Tool("search backend down".to_string())),
        }
    }
}

#[tokio::test]
async fn long_search_result_is_truncated_to_marker() {
    let backend = FakeSearch {
        payload: Ok("x".repeat(1500)),
    };
    let tool = SearchTool::new(Arc::new(backend));

    let text = tool
        .invoke(serde_json::json!({ "query": "rust" }))
        .await
        .into_text();

    assert!(text.ends_with("..."));
    assert_eq!(text.chars().count(), 1003);
    assert_eq!(&text[..1000], "x".repeat(1000).as_str());
}

#[tokio::test]
async fn tiny_search_result_counts_as_no_results() {
    let backend = FakeSearch {
        payload: Ok("brief".to_string()),
    };
    let tool = SearchTool::new(Arc::new(backend));

    let reply = tool.invoke(serde_json::json!({ "query": "rust" })).await;

    assert_eq!(reply.failure_kind(), Some(FailureKind::Empty));
    assert_eq!(
        reply.into_text(),
        "No relevant results found for 'rust'. Please try a different search term."
    );
}

#[tokio::test]
async fn search_backend_failure_is_a_handled_string() {
    let backend = FakeSearch {
        payload: Err(Error::Tool("down".to_string())),
    };
    let tool = SearchTool::new(Arc::new(backend));

    let reply = tool.invoke(serde_json::json!({ "query": "rust" })).await;

    assert_eq!(reply.failure_kind(), Some(FailureKind::Upstream));
    assert_eq!(
        reply.into_text(),
        "Search error for 'rust'. Please try again or rephrase your query."
    );
}

#[tokio::test]
async fn moderate_search_result_passes_through_untruncated() {
    let backend = FakeSearch {
        payload: Ok("Rust is a systems programming language.".to_string()),
    };
    let tool = SearchTool::new(Arc::new(backend));

    let text = tool
        .invoke(serde_json::json!({ "query": "rust" }))
        .await
        .into_text();

    assert_eq!(text, "Rust is a systems programming language.");
}
