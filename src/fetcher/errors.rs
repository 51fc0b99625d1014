use thiserror::Error;

/// Why a single fetch attempt was rejected. Attempt failures are never
/// terminal on their own; the negotiation loop moves on to the next
/// attempt and only `FetchError::Exhausted` reaches the caller.
#[derive(Error, Debug)]
pub enum AttemptFailure {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("http status {0}")]
    Status(reqwest::StatusCode),

    #[error("empty response body")]
    EmptyBody,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(String),

    #[error("all {attempts} fetch attempts failed for {shortcode}")]
    Exhausted { shortcode: String, attempts: usize },
}
