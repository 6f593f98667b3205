use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::WeatherError;

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast"; // 5d/3h

/* ============================ OpenWeather types ============================ */

#[derive(Deserialize, Debug)]
pub struct CurrentResp {
    pub coord: Coord,
    pub timezone: i32, // seconds from UTC
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize, Debug)]
pub struct ForecastResp {
    pub list: Vec<ForecastEntry>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: Main,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Main {
    pub feels_like: f64,
    pub temp_min: f64,
}

#[derive(Deserialize, Debug)]
pub struct OneCallResp {
    pub daily: Vec<DailyEntry>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct DailyEntry {
    pub sunrise: i64,
    pub sunset: i64,
}

/* ============================ HTTP ============================ */

pub async fn fetch_current(client: &Client, cfg: &Config) -> Result<CurrentResp, WeatherError> {
    let url = format!("{}{}", cfg.base_url, CURRENT_PATH);
    tracing::debug!(city = %cfg.city, "requesting current weather");
    let resp = client
        .get(url)
        .query(&[
            ("q", cfg.city.as_str()),
            ("appid", cfg.api_key.as_str()),
            ("units", cfg.units.as_str()),
            ("lang", cfg.lang.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.json::<CurrentResp>().await?)
}

pub async fn fetch_forecast(client: &Client, cfg: &Config) -> Result<ForecastResp, WeatherError> {
    let url = format!("{}{}", cfg.base_url, FORECAST_PATH);
    tracing::debug!(city = %cfg.city, "requesting 5 day forecast");
    let resp = client
        .get(url)
        .query(&[
            ("q", cfg.city.as_str()),
            ("appid", cfg.api_key.as_str()),
            ("units", cfg.units.as_str()),
            ("lang", cfg.lang.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.json::<ForecastResp>().await?)
}

pub async fn fetch_one_call(
    client: &Client,
    cfg: &Config,
    coord: Coord,
) -> Result<OneCallResp, WeatherError> {
    let url = format!("{}{}", cfg.base_url, cfg.onecall_path);
    let (lat, lon) = (coord.lat.to_string(), coord.lon.to_string());
    tracing::debug!(%lat, %lon, "requesting one-call daily forecast");
    let resp = client
        .get(url)
        .query(&[
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("exclude", "hourly,minutely"),
            ("appid", cfg.api_key.as_str()),
            ("units", cfg.units.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.json::<OneCallResp>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> Config {
        Config {
            api_key: "test_key".into(),
            city: "Dmitrov".into(),
            units: "metric".into(),
            lang: "en".into(),
            base_url: base_url.into(),
            onecall_path: "/data/2.5/onecall".into(),
        }
    }

    #[tokio::test]
    async fn test_fetch_current_sends_city_and_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Dmitrov"))
            .and(query_param("appid", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "coord": {"lon": 37.5167, "lat": 56.35},
                "timezone": 10800,
                "name": "Dmitrov"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let cfg = test_config(&mock_server.uri());
        let cur = fetch_current(&Client::new(), &cfg).await.unwrap();

        assert_eq!(cur.timezone, 10800);
        assert!((cur.coord.lat - 56.35).abs() < 1e-9);
        assert!((cur.coord.lon - 37.5167).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fetch_current_unknown_city_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404", "message": "city not found"
            })))
            .mount(&mock_server)
            .await;

        let cfg = test_config(&mock_server.uri());
        let err = fetch_current(&Client::new(), &cfg).await.unwrap_err();
        assert!(matches!(err, WeatherError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_one_call_uses_coordinates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/onecall"))
            .and(query_param("lat", "56.35"))
            .and(query_param("lon", "37.5167"))
            .and(query_param("exclude", "hourly,minutely"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "lat": 56.35, "lon": 37.5167, "timezone_offset": 10800,
                "daily": [
                    {"dt": 1624266000, "sunrise": 1624233600, "sunset": 1624296000, "temp": {"min": 12.0}},
                    {"dt": 1624352400, "sunrise": 1624320000, "sunset": 1624382400}
                ]
            })))
            .mount(&mock_server)
            .await;

        let cfg = test_config(&mock_server.uri());
        let coord = Coord { lat: 56.35, lon: 37.5167 };
        let oc = fetch_one_call(&Client::new(), &cfg, coord).await.unwrap();

        assert_eq!(oc.daily.len(), 2);
        assert_eq!(oc.daily[0].sunset - oc.daily[0].sunrise, 62_400);
    }

    #[tokio::test]
    async fn test_fetch_forecast_malformed_body_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": [{"dt": 1, "main": {"temp": 3.0}}]
            })))
            .mount(&mock_server)
            .await;

        let cfg = test_config(&mock_server.uri());
        assert!(fetch_forecast(&Client::new(), &cfg).await.is_err());
    }
}
