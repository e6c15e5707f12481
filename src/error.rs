use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("payload decoding error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected status code: {0}")]
    Status(reqwest::StatusCode),
}
