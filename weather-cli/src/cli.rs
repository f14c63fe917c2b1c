use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Text};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use weather_core::{
    Config, Coordinate, FixedLocationService, IpLocationService, LocationService,
    OpenWeatherClient, UiEvent, WeatherClient, WeatherScreen, screen::UiHandle,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Current weather by city or location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and an optional fixed location.
    Configure,

    /// Show current weather for a city.
    City {
        /// City name, e.g. "London" or "New York".
        name: String,
    },

    /// Show current weather for a coordinate.
    Coords {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Interactive screen (default). Type a city, `:here` for the current location, `:quit` to exit.
    Screen {
        /// Use this position instead of the configured or IP-based one.
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Screen { lat: None, lon: None }) {
            Command::Configure => configure(),
            Command::City { name } => {
                let name = name.trim();
                if name.is_empty() {
                    bail!("City name must not be empty");
                }

                let client = client_from_config()?;
                let model = client
                    .fetch_by_city(name)
                    .await
                    .with_context(|| format!("Failed to fetch weather for '{name}'"))?;
                println!("{}", render::model_line(&model));
                Ok(())
            }
            Command::Coords { lat, lon } => {
                let coord = Coordinate::new(lat, lon);
                let client = client_from_config()?;
                let model = client
                    .fetch_by_coordinate(coord)
                    .await
                    .with_context(|| format!("Failed to fetch weather for {coord}"))?;
                println!("{}", render::model_line(&model));
                Ok(())
            }
            Command::Screen { lat, lon } => {
                let override_coord = lat.zip(lon).map(|(lat, lon)| Coordinate::new(lat, lon));
                screen(override_coord).await
            }
        }
    }
}

fn client_from_config() -> anyhow::Result<OpenWeatherClient> {
    let config = Config::load()?;
    OpenWeatherClient::from_config(&config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Text::new("OpenWeather API key:")
        .with_default(config.api_key.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(key);

    let fixed = Confirm::new("Use a fixed location instead of IP lookup?")
        .with_default(config.location.is_some())
        .prompt()
        .context("Failed to read answer")?;

    config.location = if fixed {
        let lat = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a number")
            .prompt()
            .context("Failed to read latitude")?;
        let lon = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a number")
            .prompt()
            .context("Failed to read longitude")?;
        Some(Coordinate::new(lat, lon))
    } else {
        None
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn screen(override_coord: Option<Coordinate>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let client: Arc<dyn WeatherClient> = Arc::new(OpenWeatherClient::from_config(&config)?);

    let location: Arc<dyn LocationService> = match override_coord.or(config.location) {
        Some(coord) => Arc::new(FixedLocationService::new(coord)),
        None => Arc::new(IpLocationService::new()),
    };

    let (screen, events) = WeatherScreen::new(client, location);
    tokio::spawn(read_input(screen.ui_handle()));

    render::banner();
    screen.run(events, render::draw).await;
    Ok(())
}

/// Turn stdin lines into UI events. End of input quits.
async fn read_input(ui: UiHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let event = match lines.next_line().await {
            Ok(Some(line)) => input_event(&line),
            Ok(None) => UiEvent::Quit,
            Err(e) => {
                debug!(error = %e, "failed to read input");
                UiEvent::Quit
            }
        };

        let quit = matches!(event, UiEvent::Quit);
        if ui.send(event).is_err() || quit {
            break;
        }
    }
}

fn input_event(line: &str) -> UiEvent {
    match line.trim() {
        ":here" => UiEvent::CurrentLocation,
        ":quit" | ":q" => UiEvent::Quit,
        _ => UiEvent::Submit(line.to_string()),
    }
}
