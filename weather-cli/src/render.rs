use chrono::{DateTime, Local};
use std::io::{self, Write};
use tracing::debug;

use weather_core::{DisplayState, Update, WeatherModel, WeatherScreen, screen::SearchField};

const PROMPT: &str = "search> ";

/// Terminal glyph for an icon name from [`WeatherModel::condition_name`].
pub fn glyph(icon: &str) -> &'static str {
    match icon {
        "cloud.bolt" => "⛈",
        "cloud.drizzle" => "🌦",
        "cloud.rain" => "🌧",
        "cloud.snow" => "🌨",
        "cloud.fog" => "🌫",
        "sun.max" => "☀",
        _ => "☁",
    }
}

pub fn model_line(model: &WeatherModel) -> String {
    format!(
        "{}  {}°C  {} ({})",
        glyph(model.condition_name()),
        model.temperature_string(),
        model.city_name,
        model.description,
    )
}

fn updated_label(at: DateTime<Local>) -> String {
    format!("updated {}", at.format("%H:%M:%S"))
}

pub fn display_lines(display: Option<&DisplayState>) -> Vec<String> {
    match display {
        Some(d) => vec![
            format!("{}  {}°C  {}", glyph(d.icon), d.temperature, d.city),
            format!("   {} · {}", d.description, updated_label(d.updated_at)),
        ],
        None => vec!["   -- °C  waiting for weather".to_string()],
    }
}

pub fn banner() {
    println!("Type a city and press enter. `:here` uses your location, `:quit` exits.");
}

pub fn draw(screen: &WeatherScreen, update: Update) {
    let mut out = std::io::stdout().lock();

    if let Err(e) = write_screen(&mut out, update, screen.display(), screen.search()) {
        debug!(error = %e, "failed to draw screen");
    }
}

fn write_screen(
    out: &mut impl Write,
    update: Update,
    display: Option<&DisplayState>,
    search: &SearchField,
) -> io::Result<()> {
    if update == Update::Display {
        writeln!(out)?;
        for line in display_lines(display) {
            writeln!(out, "{line}")?;
        }
    }

    match search.placeholder {
        Some(placeholder) if search.focused => write!(out, "{PROMPT}({placeholder}) ")?,
        _ => write!(out, "{PROMPT}")?,
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn every_icon_has_a_glyph() {
        assert_eq!(glyph("sun.max"), "☀");
        assert_eq!(glyph("cloud.rain"), "🌧");
        assert_eq!(glyph("unknown"), "☁");
    }

    #[test]
    fn model_line_shows_temperature_and_city() {
        let model = WeatherModel {
            condition_id: 800,
            description: "clear".into(),
            city_name: "London".into(),
            temperature: 15.5,
        };

        assert_eq!(model_line(&model), "☀  15.5°C  London (clear)");
    }

    #[test]
    fn empty_display_has_placeholder_line() {
        let lines = display_lines(None);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("waiting"));
    }

    #[test]
    fn display_lines_include_update_time() {
        let at = Local.with_ymd_and_hms(2024, 1, 2, 9, 5, 7).single().expect("valid time");
        let display = DisplayState {
            icon: "cloud.snow",
            temperature: "-3.0".into(),
            city: "Oslo".into(),
            description: "light snow".into(),
            updated_at: at,
        };

        let lines = display_lines(Some(&display));
        assert_eq!(lines[0], "🌨  -3.0°C  Oslo");
        assert!(lines[1].contains("light snow"));
        assert!(lines[1].ends_with("updated 09:05:07"));
    }

    #[test]
    fn prompt_shows_placeholder_only_when_focused() {
        let mut out: Vec<u8> = Vec::new();
        let search = SearchField {
            text: String::new(),
            placeholder: Some("write some..."),
            focused: true,
        };
        write_screen(&mut out, Update::Search, None, &search).expect("write to vec");
        assert_eq!(String::from_utf8(out).expect("utf8"), "search> (write some...) ");

        let mut out: Vec<u8> = Vec::new();
        write_screen(&mut out, Update::Search, None, &SearchField::default()).expect("write to vec");
        assert_eq!(String::from_utf8(out).expect("utf8"), "search> ");
    }

    #[test]
    fn display_update_draws_lines_before_prompt() {
        let mut out: Vec<u8> = Vec::new();
        write_screen(&mut out, Update::Display, None, &SearchField::default()).expect("write to vec");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("\n   -- °C  waiting for weather\n"));
        assert!(text.ends_with("search> "));
    }
}
