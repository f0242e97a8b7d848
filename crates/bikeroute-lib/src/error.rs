use thiserror::Error;

/// Convenient result alias for the bike route library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Only the I/O boundary (maps provider, notifier) produces errors; the
/// refinement stages are total and never fail.
#[derive(Debug, Error)]
pub enum Error {
    /// The provider answered with a non-`OK` status document.
    #[error("maps provider returned status {status}{}", format_message(.message))]
    ProviderStatus {
        status: String,
        message: Option<String>,
    },

    /// The provider answered with a non-success HTTP status code.
    #[error("maps provider responded with HTTP {status}")]
    ProviderHttp { status: u16 },

    /// The provider could not geocode the origin or destination.
    #[error("location could not be resolved: {location}")]
    LocationNotFound { location: String },

    /// The notification server refused a message.
    #[error("notification to topic {topic} rejected with HTTP {status}")]
    NotificationRejected { topic: String, status: u16 },

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn format_message(message: &Option<String>) -> String {
    match message.as_deref() {
        Some(text) if !text.is_empty() => format!(": {}", text),
        _ => String::new(),
    }
}
