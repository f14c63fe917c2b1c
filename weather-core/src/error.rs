use thiserror::Error;

/// Failure of a single weather lookup.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Request could not be built or sent, or the body could not be read.
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Weather request failed with status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("Invalid request URL: {0}")]
    Url(String),

    #[error("Failed to parse weather response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Weather response contained no condition")]
    MissingCondition,
}

impl WeatherError {
    pub fn is_transport(&self) -> bool {
        matches!(self, WeatherError::Transport(_) | WeatherError::Status { .. } | WeatherError::Url(_))
    }

    pub fn is_decode(&self) -> bool {
        !self.is_transport()
    }
}

#[derive(Error, Debug)]
pub enum LocationError {
    #[error("Location access was denied")]
    Denied,

    #[error("Location lookup failed: {0}")]
    Lookup(String),

    #[error("Location lookup returned no position")]
    NoFix,

    #[error("Location subscription was cancelled before a fix arrived")]
    Cancelled,

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_are_not_transport() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = WeatherError::from(json_err);
        assert!(err.is_decode());
        assert!(!err.is_transport());

        assert!(WeatherError::MissingCondition.is_decode());
    }

    #[test]
    fn status_errors_are_transport() {
        let err = WeatherError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "city not found".into(),
        };
        assert!(err.is_transport());
        assert!(err.to_string().contains("404"));
    }
}
