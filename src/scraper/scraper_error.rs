use thiserror::Error;

/// Failures of a single page request. Every variant is transient from the
/// point of view of a run: the page loop stops and keeps what it has.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Listings API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<reqwest::Error> for ScraperError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScraperError::Timeout(e.to_string())
        } else {
            ScraperError::Network(e.to_string())
        }
    }
}
