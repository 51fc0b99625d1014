use thiserror::Error;

use crate::fetcher::FetchError;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page was fetched but no strategy recovered a media URL. The
    /// platform markup likely changed, or the content is private or not a
    /// video. `context` names the last stage that was applied.
    #[error("no media found for {shortcode}: {context}")]
    NoMediaFound { shortcode: String, context: String },
}
