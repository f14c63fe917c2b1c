//! Core library for the `clima` weather screen.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather client seam and its OpenWeather implementation
//! - Location services with one-shot fixes
//! - The screen state machine and its UI event loop
//!
//! It is used by `weather-cli`, but can also be driven by other front ends.

pub mod client;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod screen;

pub use client::{OpenWeatherClient, WeatherClient};
pub use config::Config;
pub use error::{LocationError, WeatherError};
pub use location::{Authorization, FixedLocationService, IpLocationService, LocationService};
pub use model::{Coordinate, WeatherModel};
pub use screen::{DisplayState, UiEvent, Update, WeatherScreen};
