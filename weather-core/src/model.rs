use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// Current conditions for one place, as shown on the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherModel {
    pub condition_id: i64,
    pub description: String,
    pub city_name: String,
    /// Degrees Celsius.
    pub temperature: f64,
}

impl WeatherModel {
    /// Icon name for the condition code.
    ///
    /// Groups follow the OpenWeather condition table; unknown codes fall back to `cloud`.
    pub fn condition_name(&self) -> &'static str {
        match self.condition_id {
            200..=232 => "cloud.bolt",
            300..=321 => "cloud.drizzle",
            500..=531 => "cloud.rain",
            600..=622 => "cloud.snow",
            701..=781 => "cloud.fog",
            800 => "sun.max",
            801..=804 => "cloud",
            _ => "cloud",
        }
    }

    pub fn temperature_string(&self) -> String {
        format!("{:.1}", self.temperature)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeatherData {
    name: String,
    main: Main,
    weather: Vec<Weather>,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Weather {
    id: i64,
    description: String,
}

impl WeatherData {
    /// Only the first condition is kept.
    pub(crate) fn into_model(self) -> Result<WeatherModel, WeatherError> {
        let first = self.weather.into_iter().next().ok_or(WeatherError::MissingCondition)?;

        Ok(WeatherModel {
            condition_id: first.id,
            description: first.description,
            city_name: self.name,
            temperature: self.main.temp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: i64, temp: f64) -> WeatherModel {
        WeatherModel {
            condition_id: id,
            description: "test".into(),
            city_name: "Testville".into(),
            temperature: temp,
        }
    }

    #[test]
    fn condition_groups_map_to_icons() {
        assert_eq!(model(211, 0.0).condition_name(), "cloud.bolt");
        assert_eq!(model(301, 0.0).condition_name(), "cloud.drizzle");
        assert_eq!(model(502, 0.0).condition_name(), "cloud.rain");
        assert_eq!(model(601, 0.0).condition_name(), "cloud.snow");
        assert_eq!(model(741, 0.0).condition_name(), "cloud.fog");
        assert_eq!(model(800, 0.0).condition_name(), "sun.max");
        assert_eq!(model(803, 0.0).condition_name(), "cloud");
    }

    #[test]
    fn unknown_condition_falls_back_to_cloud() {
        assert_eq!(model(0, 0.0).condition_name(), "cloud");
        assert_eq!(model(950, 0.0).condition_name(), "cloud");
    }

    #[test]
    fn temperature_has_one_decimal() {
        assert_eq!(model(800, 15.5).temperature_string(), "15.5");
        assert_eq!(model(800, -3.0).temperature_string(), "-3.0");
        assert_eq!(model(800, 21.04).temperature_string(), "21.0");
    }

    #[test]
    fn empty_weather_list_is_rejected() {
        let data: WeatherData =
            serde_json::from_str(r#"{"name":"Nowhere","main":{"temp":1.0},"weather":[]}"#)
                .expect("shape is valid");

        let err = data.into_model().unwrap_err();
        assert!(matches!(err, WeatherError::MissingCondition));
    }
}
