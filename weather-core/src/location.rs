use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::debug;

use crate::{error::LocationError, model::Coordinate};

pub const IP_LOCATION_ENDPOINT: &str = "https://ipapi.co/json/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    WhenInUse,
    Denied,
}

/// Source of the device position.
#[async_trait]
pub trait LocationService: Send + Sync + Debug {
    /// Ask for "when in use" access.
    async fn request_authorization(&self) -> Authorization;

    /// One position lookup. May return several fixes; the newest is last.
    async fn request_location(&self) -> Result<Vec<Coordinate>, LocationError>;
}

/// A single location request that delivers its first result and is then spent.
///
/// Dropping the subscription before the result arrives cancels the lookup.
#[derive(Debug)]
pub struct LocationSubscription {
    rx: oneshot::Receiver<Result<Vec<Coordinate>, LocationError>>,
    task: JoinHandle<()>,
}

impl LocationSubscription {
    pub fn start(service: Arc<dyn LocationService>) -> Self {
        let (tx, rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let result = service.request_location().await;
            if tx.send(result).is_err() {
                debug!("location subscription dropped before delivery");
            }
        });

        Self { rx, task }
    }

    pub async fn recv(mut self) -> Result<Vec<Coordinate>, LocationError> {
        (&mut self.rx).await.unwrap_or(Err(LocationError::Cancelled))
    }
}

impl Drop for LocationSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Approximate position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocationService {
    endpoint: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpLocationResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

impl IpLocationService {
    pub fn new() -> Self {
        Self::with_endpoint(IP_LOCATION_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: Client::new() }
    }
}

impl Default for IpLocationService {
    fn default() -> Self {
        Self::new()
    }
}

fn coordinate_from(res: IpLocationResponse) -> Result<Coordinate, LocationError> {
    if res.error {
        return Err(LocationError::Lookup(
            res.reason.unwrap_or_else(|| "unknown reason".to_string()),
        ));
    }

    match (res.latitude, res.longitude) {
        (Some(lat), Some(lon)) => Ok(Coordinate::new(lat, lon)),
        _ => Err(LocationError::NoFix),
    }
}

#[async_trait]
impl LocationService for IpLocationService {
    async fn request_authorization(&self) -> Authorization {
        Authorization::WhenInUse
    }

    async fn request_location(&self) -> Result<Vec<Coordinate>, LocationError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("clima/", env!("CARGO_PKG_VERSION"))),
        );

        let res: IpLocationResponse = self
            .http
            .get(&self.endpoint)
            .headers(headers)
            .send()
            .await?
            .json()
            .await?;

        let coord = coordinate_from(res)?;
        debug!(%coord, "resolved ip location");
        Ok(vec![coord])
    }
}

/// Always reports the same position, e.g. from config.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationService {
    coord: Coordinate,
}

impl FixedLocationService {
    pub fn new(coord: Coordinate) -> Self {
        Self { coord }
    }
}

#[async_trait]
impl LocationService for FixedLocationService {
    async fn request_authorization(&self) -> Authorization {
        Authorization::WhenInUse
    }

    async fn request_location(&self) -> Result<Vec<Coordinate>, LocationError> {
        Ok(vec![self.coord])
    }
}
