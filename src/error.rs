use thiserror::Error;

/// Failures of the upstream odds feed. Surfaced to the caller as-is; the
/// cart core itself has no failure states.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("odds request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("odds api returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode odds payload: {0}")]
    Decode(#[from] serde_json::Error),
}
