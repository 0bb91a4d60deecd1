//! Google Directions HTTP adapter for pairwise distances.

use serde::Deserialize;
use thiserror::Error;

use crate::traits::{Coordinate, Directions, DirectionsProvider};

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

/// Reasons a single directions query yields no distance.
#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("API key not found (set GCP_API_KEY)")]
    MissingCredential,
    #[error("no route found (status {status})")]
    NoRoute { status: String },
    #[error("directions response contained no route legs")]
    MissingLeg,
    #[error("could not read a distance from {text:?}")]
    MalformedDistance { text: String },
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::blocking::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/maps/api/directions/json",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

impl DirectionsProvider for DirectionsClient {
    fn directions(&self, origin: &str, destination: &str) -> Result<Directions, DirectionsError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(DirectionsError::MissingCredential);
        };

        let body = self
            .client
            .get(self.url())
            .query(&[("origin", origin), ("destination", destination), ("key", api_key)])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<DirectionsResponse>())?;

        directions_from_response(body)
    }
}

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<RouteBody>,
}

#[derive(Debug, Deserialize)]
struct RouteBody {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: TextValue,
    start_location: Option<Coordinate>,
    end_location: Option<Coordinate>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

/// Extract the first leg of the first route from a decoded response.
pub fn directions_from_response(body: DirectionsResponse) -> Result<Directions, DirectionsError> {
    if body.status != "OK" {
        return Err(DirectionsError::NoRoute { status: body.status });
    }

    let leg = body
        .routes
        .into_iter()
        .next()
        .and_then(|route| route.legs.into_iter().next())
        .ok_or(DirectionsError::MissingLeg)?;

    Ok(Directions {
        distance: parse_distance_text(&leg.distance.text)?,
        origin: leg.start_location,
        destination: leg.end_location,
    })
}

/// Read the leading numeric token of a distance label such as `"4.2 km"`.
///
/// The unit is not converted.
pub fn parse_distance_text(text: &str) -> Result<f64, DirectionsError> {
    let malformed = || DirectionsError::MalformedDistance {
        text: text.to_string(),
    };

    let token = text.split_whitespace().next().ok_or_else(malformed)?;
    let value: f64 = token.replace(',', "").parse().map_err(|_| malformed())?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(malformed())
    }
}
