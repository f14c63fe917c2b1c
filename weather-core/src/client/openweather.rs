use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::{
    Config,
    error::WeatherError,
    model::{Coordinate, WeatherData, WeatherModel},
};

use super::WeatherClient;

/// Temperatures are always requested in Celsius.
const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    endpoint: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.endpoint.clone(), config.api_key()?))
    }

    /// `<endpoint>?appid=..&units=metric&q=<name>`
    pub fn city_url(&self, name: &str) -> Result<Url, WeatherError> {
        let mut url = self.base_url()?;
        url.query_pairs_mut().append_pair("q", name);
        Ok(url)
    }

    /// `<endpoint>?appid=..&units=metric&lat=<lat>&lon=<lon>`
    pub fn coordinate_url(&self, coord: Coordinate) -> Result<Url, WeatherError> {
        let mut url = self.base_url()?;
        url.query_pairs_mut()
            .append_pair("lat", &coord.lat.to_string())
            .append_pair("lon", &coord.lon.to_string());
        Ok(url)
    }

    fn base_url(&self) -> Result<Url, WeatherError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| WeatherError::Url(format!("{}: {e}", self.endpoint)))?;
        url.query_pairs_mut()
            .append_pair("appid", &self.api_key)
            .append_pair("units", UNITS);
        Ok(url)
    }

    async fn perform(&self, url: Url) -> Result<WeatherModel, WeatherError> {
        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status { status, body: truncate_body(&body) });
        }

        let model = decode(&body)?;
        debug!(?model, "decoded weather response");
        Ok(model)
    }
}

/// Decode an OpenWeather current-weather body.
pub fn decode(body: &str) -> Result<WeatherModel, WeatherError> {
    let data: WeatherData = serde_json::from_str(body)?;
    data.into_model()
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch_by_city(&self, name: &str) -> Result<WeatherModel, WeatherError> {
        info!(city = name, "fetching weather by city");
        let url = self.city_url(name)?;
        self.perform(url).await
    }

    async fn fetch_by_coordinate(&self, coord: Coordinate) -> Result<WeatherModel, WeatherError> {
        info!(lat = coord.lat, lon = coord.lon, "fetching weather by coordinate");
        let url = self.coordinate_url(coord)?;
        self.perform(url).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
