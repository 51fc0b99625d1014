pub mod attempts;
pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use attempts::build_attempts;
pub use client::PageFetcher;
pub use errors::{AttemptFailure, FetchError};
pub use types::{ClientProfile, FetchAttempt, FetchOutcome, FetchSettings, PageResponse};
