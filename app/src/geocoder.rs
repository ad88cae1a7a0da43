use crate::error::{Result, RiskError};
use crate::types::Coordinates;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for a Nominatim-compatible `/search` endpoint.
pub struct Geocoder {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl Geocoder {
    pub fn new(base_url: String, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(RiskError::Http)?;

        Ok(Self { client, base_url })
    }

    /// Resolve a place name. Absence is an ordinary outcome: every failure
    /// (timeout, HTTP error, no match, unparsable body) yields `None`.
    pub async fn resolve(&self, name: &str) -> Option<Coordinates> {
        match self.lookup(name).await {
            Ok(Some(coords)) => {
                debug!("Resolved {} to {}", name, coords);
                Some(coords)
            }
            Ok(None) => {
                debug!("No geocoding match for {}", name);
                None
            }
            Err(e) => {
                warn!("Error getting coordinates for {}: {}", name, e);
                None
            }
        }
    }

    async fn lookup(&self, name: &str) -> Result<Option<Coordinates>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", name), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RiskError::InvalidResponse(format!(
                "HTTP {} for url={}",
                response.status(),
                url
            )));
        }

        let places: Vec<Place> = response.json().await?;
        places.into_iter().next().map(parse_place).transpose()
    }
}

fn parse_place(place: Place) -> Result<Coordinates> {
    let parse = |raw: &str| {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RiskError::InvalidResponse(format!("bad coordinate '{raw}'")))
    };
    Ok(Coordinates::new(parse(&place.lat)?, parse(&place.lon)?))
}
