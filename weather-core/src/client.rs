use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{Coordinate, WeatherModel},
};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Looks up current conditions.
///
/// Both operations resolve exactly once, with either a model or an error.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_by_city(&self, name: &str) -> Result<WeatherModel, WeatherError>;

    async fn fetch_by_coordinate(&self, coord: Coordinate) -> Result<WeatherModel, WeatherError>;
}
