use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use super::{Observation, ObservationSource};

const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Observation source backed by the free OpenWeather current-weather API.
#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl ObservationSource for OpenWeatherSource {
    async fn fetch_current(&self, city: &str) -> Result<Observation> {
        debug!("fetching current observation for '{city}'");

        let res = self
            .http
            .get(CURRENT_WEATHER_URL)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(anyhow!(
                "OpenWeather does not know a city named '{city}'. Check the spelling."
            ));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(anyhow!("OpenWeather rejected the configured API key"));
        }
        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let observed_at = unix_to_utc(parsed.dt).unwrap_or_else(Utc::now);
        let condition = parsed.weather.first().map(|w| w.main.clone());

        Ok(Observation {
            location_name: parsed.name,
            country: parsed.sys.country.unwrap_or_default(),
            lat: parsed.coord.lat,
            lon: parsed.coord.lon,
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            condition,
            observed_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: Option<u8>,
    pressure: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: OwCoord,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_response_parses_with_missing_optional_fields() {
        let json = r#"{
            "name": "Tokyo",
            "dt": 1755000000,
            "coord": {"lat": 35.68, "lon": 139.69},
            "sys": {},
            "main": {"temp": 27.4},
            "weather": []
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.name, "Tokyo");
        assert_eq!(parsed.main.humidity, None);
        assert_eq!(parsed.main.pressure, None);
        assert!(parsed.sys.country.is_none());
    }

    #[test]
    fn full_response_maps_to_observation_fields() {
        let json = r#"{
            "name": "Oslo",
            "dt": 1755000000,
            "coord": {"lat": 59.91, "lon": 10.75},
            "sys": {"country": "NO"},
            "main": {"temp": 12.1, "humidity": 71, "pressure": 1009},
            "weather": [{"main": "Rain"}, {"main": "Drizzle"}]
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.sys.country.as_deref(), Some("NO"));
        assert_eq!(parsed.main.pressure, Some(1009));
        // Only the first condition entry is kept.
        assert_eq!(parsed.weather.first().map(|w| w.main.as_str()), Some("Rain"));
    }

    #[test]
    fn truncate_body_caps_long_payloads() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert!(out.len() < 250);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn unix_to_utc_handles_valid_timestamps() {
        let dt = unix_to_utc(0).unwrap();
        assert_eq!(dt.to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }
}
