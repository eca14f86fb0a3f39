/// Result type alias for page fetches.
pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Only http/https URLs are allowed, got: {0}")]
    UnsupportedScheme(String),

    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },

    #[error("Not an HTML page (content-type: {content_type})")]
    NotHtml { content_type: String },

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
