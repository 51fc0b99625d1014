use std::time::Duration;

use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
    REFERER, USER_AGENT,
};
use reqwest::{Client, ClientBuilder};
use tracing::{debug, instrument};

use crate::fetcher::attempts::build_attempts;
use crate::fetcher::errors::{AttemptFailure, FetchError};
use crate::fetcher::pipeline::process_response;
use crate::fetcher::types::{ClientProfile, FetchAttempt, FetchOutcome, FetchSettings};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 10;

/// Issues the ordered fetch attempts for a content page, presenting a
/// desktop or mobile browser fingerprint per attempt.
pub struct PageFetcher {
    client: Client,
    desktop_headers: HeaderMap,
    mobile_headers: HeaderMap,
}

impl PageFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(settings.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            desktop_headers: browser_headers(
                &settings.desktop_user_agent,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )?,
            mobile_headers: browser_headers(
                &settings.mobile_user_agent,
                "application/json,text/html;q=0.9,*/*;q=0.8",
            )?,
        })
    }

    /// Try each fetch attempt in order until one yields a usable response.
    ///
    /// Attempts run strictly sequentially and are never retried; once the
    /// list is exhausted the whole fetch fails.
    #[instrument(skip_all, fields(shortcode = %shortcode))]
    pub async fn negotiate(
        &self,
        base_url: &str,
        shortcode: &str,
    ) -> Result<FetchOutcome, FetchError> {
        let attempts = build_attempts(base_url, shortcode);
        let total = attempts.len();

        for (index, attempt) in attempts.into_iter().enumerate() {
            match self.try_attempt(&attempt).await {
                Ok(page) => {
                    debug!(
                        attempt = index + 1,
                        url = %attempt.url,
                        profile = ?attempt.profile,
                        status = %page.status,
                        "fetch attempt succeeded"
                    );
                    return Ok(FetchOutcome {
                        page,
                        attempt,
                        index,
                    });
                }
                Err(failure) => {
                    debug!(
                        attempt = index + 1,
                        url = %attempt.url,
                        profile = ?attempt.profile,
                        error = %failure,
                        "fetch attempt failed"
                    );
                }
            }
        }

        Err(FetchError::Exhausted {
            shortcode: shortcode.to_string(),
            attempts: total,
        })
    }

    async fn try_attempt(
        &self,
        attempt: &FetchAttempt,
    ) -> Result<crate::fetcher::types::PageResponse, AttemptFailure> {
        let headers = match attempt.profile {
            ClientProfile::Desktop => &self.desktop_headers,
            ClientProfile::Mobile => &self.mobile_headers,
        };

        let response = self
            .client
            .get(&attempt.url)
            .headers(headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptFailure::Status(status));
        }

        let url_final = response.url().clone();
        let response_headers = response.headers().clone();
        let content_type = response_headers
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        let body_bytes = response.bytes().await?;
        if body_bytes.is_empty() {
            return Err(AttemptFailure::EmptyBody);
        }

        Ok(process_response(
            url_final,
            status,
            response_headers,
            body_bytes,
            &content_type,
        ))
    }
}

fn browser_headers(user_agent: &str, accept: &'static str) -> Result<HeaderMap, FetchError> {
    let ua = HeaderValue::from_str(user_agent)
        .map_err(|e| FetchError::Client(format!("invalid user agent: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, ua);
    headers.insert(ACCEPT, HeaderValue::from_static(accept));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(
        REFERER,
        HeaderValue::from_static("https://www.instagram.com/"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    Ok(headers)
}
