//! OpenWeather provider and dashboard behaviour against a mock HTTP server.

use chrono::{DateTime, TimeZone, Utc};
use weather_core::{
    Dashboard, IpGeolocator, Location, OpenWeatherProvider, UiState, Units, WeatherError,
    WeatherProvider, location::resolve_location,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

fn current_ok() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 28.9497, "lat": 41.0138 },
        "weather": [
            { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }
        ],
        "main": {
            "temp": 17.5,
            "feels_like": 17.2,
            "temp_min": 16.1,
            "temp_max": 18.3,
            "pressure": 1012,
            "humidity": 82
        },
        "wind": { "speed": 5.66, "deg": 40 },
        "sys": { "country": "TR", "sunrise": 1714532133, "sunset": 1714582012 },
        "name": "Istanbul",
        "cod": 200
    })
}

fn forecast_item(dt: i64, dt_txt: &str, max: f64, min: f64, icon: &str) -> serde_json::Value {
    serde_json::json!({
        "dt": dt,
        "main": { "temp": (max + min) / 2.0, "temp_min": min, "temp_max": max },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": icon }],
        "dt_txt": dt_txt
    })
}

/// Three-hourly series from 2024-05-01 09:00 UTC covering six middays.
fn forecast_ok() -> serde_json::Value {
    let start = 1_714_554_000_i64; // 2024-05-01 09:00:00 UTC
    let list: Vec<_> = (0..48)
        .map(|i| {
            let dt = start + i * 3 * 3600;
            let when = chrono::DateTime::from_timestamp(dt, 0).unwrap();
            let label = when.format("%Y-%m-%d %H:%M:%S").to_string();
            forecast_item(dt, &label, 20.0 + i as f64 / 10.0, 10.5, "01d")
        })
        .collect();

    serde_json::json!({ "cod": "200", "message": 0, "cnt": list.len(), "list": list })
}

fn not_found_body() -> serde_json::Value {
    serde_json::json!({ "cod": "404", "message": "city not found" })
}

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".to_string())
        .with_base_url(server.uri())
        .with_units(Units::Metric)
        .with_lang("en")
}

async fn mount(server: &MockServer, endpoint: &str, body: serde_json::Value, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/{endpoint}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn current_conditions_by_city_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Istanbul"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "en"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_ok()))
        .expect(1)
        .mount(&server)
        .await;

    let current = provider(&server).current(&Location::city("Istanbul")).await.unwrap();

    assert_eq!(current.place, "Istanbul");
    assert_eq!(current.country, "TR");
    assert_eq!(current.category, "Rain");
    assert_eq!(current.description, "light rain");
    assert_eq!(current.icon, "10d");
    assert_eq!(current.humidity_pct, 82);
    assert_eq!(current.pressure_hpa, 1012);
    assert!((current.wind_speed - 5.66).abs() < f64::EPSILON);
}

#[tokio::test]
async fn current_conditions_by_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "41.01"))
        .and(query_param("lon", "28.95"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_ok()))
        .expect(1)
        .mount(&server)
        .await;

    let location = Location::Coordinates { lat: 41.01, lon: 28.95 };
    let current = provider(&server).current(&location).await.unwrap();

    assert_eq!(current.place, "Istanbul");
}

#[tokio::test]
async fn not_found_status_is_reported_regardless_of_http_status() {
    let server = MockServer::start().await;
    mount(&server, "weather", not_found_body(), 404).await;

    let err = provider(&server).current(&Location::city("Atlantis")).await.unwrap_err();

    match err {
        WeatherError::NotFound { status, message } => {
            assert_eq!(status, "404");
            assert_eq!(message, "city not found");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_status_field_counts_as_not_found() {
    let server = MockServer::start().await;
    let mut body = current_ok();
    body.as_object_mut().unwrap().remove("cod");
    mount(&server, "weather", body, 200).await;

    let err = provider(&server).current(&Location::city("Istanbul")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).current(&Location::city("Istanbul")).await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn forecast_accepts_textual_status() {
    let server = MockServer::start().await;
    mount(&server, "forecast", forecast_ok(), 200).await;

    let entries = provider(&server).forecast(&Location::city("Istanbul")).await.unwrap();

    assert_eq!(entries.len(), 48);
    assert_eq!(entries[0].label, "2024-05-01 09:00:00");
    assert_eq!(entries[1].label, "2024-05-01 12:00:00");
}

#[tokio::test]
async fn full_run_renders_five_forecast_days() {
    let server = MockServer::start().await;
    mount(&server, "weather", current_ok(), 200).await;
    mount(&server, "forecast", forecast_ok(), 200).await;

    let provider = provider(&server);
    let mut dash = Dashboard::new(Units::Metric);
    let view = dash.run(&provider, &Location::city("Istanbul"), &now()).await;

    assert_eq!(view.state(), UiState::Content);
    assert_eq!(view.theme, weather_core::Theme::Rain);
    assert_eq!(view.forecast.len(), 5);

    let days: Vec<_> = view.forecast.iter().map(|slot| slot.day.as_str()).collect();
    // 2024-05-03..05 are Friday, Saturday, Sunday.
    assert_eq!(days, ["Today", "Tomorrow", "Fri", "Sat", "Sun"]);

    let first = &view.forecast[0];
    assert_eq!(first.icon_url, "https://openweathermap.org/img/wn/01d.png");
    assert_eq!(first.min, "11°");

    let current = view.current.as_ref().unwrap();
    assert_eq!(current.temperature, "18°C");
    assert_eq!(current.place, "Istanbul, TR");
    assert_eq!(view.details.as_ref().unwrap().wind, "6 m/s");
}

#[tokio::test]
async fn forecast_is_never_requested_after_current_fails() {
    let server = MockServer::start().await;
    mount(&server, "weather", not_found_body(), 404).await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_ok()))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider(&server);
    let mut dash = Dashboard::new(Units::Metric);
    let view = dash.run(&provider, &Location::city("Nowhere"), &now()).await;

    assert_eq!(view.state(), UiState::NotFound);
    assert!(view.regions().not_found);
    assert!(!view.regions().loading);
}

#[tokio::test]
async fn failed_forecast_renders_nothing() {
    let server = MockServer::start().await;
    mount(&server, "weather", current_ok(), 200).await;
    mount(&server, "forecast", not_found_body(), 404).await;

    let provider = provider(&server);
    let mut dash = Dashboard::new(Units::Metric);
    let view = dash.run(&provider, &Location::city("Istanbul"), &now()).await;

    assert_eq!(view.state(), UiState::NotFound);
    assert!(view.current.is_none());
    assert!(view.forecast.is_empty());
}

#[tokio::test]
async fn unreachable_server_shows_not_found() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let provider = OpenWeatherProvider::new("TEST_KEY".to_string()).with_base_url(uri);
    let mut dash = Dashboard::new(Units::Metric);
    let view = dash.run(&provider, &Location::city("Istanbul"), &now()).await;

    assert_eq!(view.state(), UiState::NotFound);
}

#[tokio::test]
async fn rendering_the_same_response_twice_is_idempotent() {
    let server = MockServer::start().await;
    mount(&server, "weather", current_ok(), 200).await;
    mount(&server, "forecast", forecast_ok(), 200).await;

    let provider = provider(&server);
    let mut dash = Dashboard::new(Units::Metric);

    let first = dash.run(&provider, &Location::city("Istanbul"), &now()).await.clone();
    let second = dash.run(&provider, &Location::city("Istanbul"), &now()).await.clone();

    assert_eq!(first, second);
    assert_eq!(second.forecast.len(), 5);
}

#[tokio::test]
async fn ip_geolocation_resolves_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "country": "Turkey",
            "city": "Ankara",
            "lat": 39.92,
            "lon": 32.85
        })))
        .expect(1)
        .mount(&server)
        .await;

    let geo = IpGeolocator::new(format!("{}/json", server.uri()), true);
    let location = resolve_location(Some(&geo), "Istanbul").await;

    assert_eq!(location, Location::Coordinates { lat: 39.92, lon: 32.85 });
}

#[tokio::test]
async fn ip_geolocation_failure_falls_back_to_default_city() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "private range"
        })))
        .mount(&server)
        .await;

    let geo = IpGeolocator::new(format!("{}/json", server.uri()), true);
    let location = resolve_location(Some(&geo), "Istanbul").await;

    assert_eq!(location, Location::city("Istanbul"));
}

#[tokio::test]
async fn ip_geolocation_without_consent_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let geo = IpGeolocator::new(format!("{}/json", server.uri()), false);
    let location = resolve_location(Some(&geo), "Izmir").await;

    assert_eq!(location, Location::city("Izmir"));
}
