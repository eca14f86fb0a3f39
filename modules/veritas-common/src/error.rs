use thiserror::Error;

#[derive(Error, Debug)]
pub enum VeritasError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
