//! `/get-weather` — current conditions for a city, via the weather
//! collaborator (`GET {weather_url}/weather/{city}`).

use axum::{Json, extract::State};
use haven_core::store::SafetyStore;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{AppState, Integrations, body::JsonBody, error::ApiError};

// ─── Upstream shape ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Upstream {
  current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
  temp_c:      f64,
  feelslike_c: f64,
  humidity:    f64,
  wind_kph:    f64,
  condition:   Condition,
  uv:          f64,
  vis_km:      f64,
  precip_mm:   f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
  text: String,
}

// ─── Our shape ────────────────────────────────────────────────────────────────

/// The subset of current conditions shown on the public page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
  pub temperature:          i64,
  pub feels_like:           i64,
  pub humidity:             f64,
  pub wind_speed:           i64,
  pub conditions:           String,
  pub uv_index:             f64,
  pub visibility:           f64,
  pub precipitation_chance: i64,
}

impl From<Current> for WeatherReport {
  fn from(c: Current) -> Self {
    WeatherReport {
      temperature:          c.temp_c.round() as i64,
      feels_like:           c.feelslike_c.round() as i64,
      humidity:             c.humidity,
      wind_speed:           c.wind_kph.round() as i64,
      conditions:           c.condition.text,
      uv_index:             c.uv,
      visibility:           c.vis_km,
      precipitation_chance: c.precip_mm.round() as i64,
    }
  }
}

/// Fetch and reshape the current weather for `city`.
pub async fn fetch(integrations: &Integrations, city: &str) -> Result<WeatherReport, ApiError> {
  let mut url = Url::parse(&integrations.weather_url)
    .map_err(|e| ApiError::Upstream(format!("Invalid weather service URL: {e}")))?;
  url
    .path_segments_mut()
    .map_err(|_| ApiError::Upstream("Invalid weather service URL".into()))?
    .pop_if_empty()
    .extend(["weather", city]);

  let response = integrations.http.get(url).send().await.map_err(|e| {
    tracing::warn!(error = %e, "weather request failed");
    ApiError::Upstream("Unable to fetch weather data".into())
  })?;

  if !response.status().is_success() {
    tracing::warn!(status = %response.status(), city, "weather service refused request");
    return Err(ApiError::Upstream("Weather service unavailable".into()));
  }

  let upstream: Upstream = response.json().await.map_err(|e| {
    tracing::warn!(error = %e, "weather response did not decode");
    ApiError::Upstream("Unable to fetch weather data".into())
  })?;
  Ok(upstream.current.into())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WeatherBody {
  pub city: Option<String>,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<WeatherBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let city = body
    .city
    .map(|c| c.trim().to_owned())
    .filter(|c| !c.is_empty())
    .ok_or_else(|| ApiError::BadRequest("City name is required".into()))?;

  let report = fetch(&state.integrations, &city).await?;
  Ok(Json(json!({ "ok": true, "data": report })))
}
