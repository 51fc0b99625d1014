use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, header::HeaderMap};
use url::Url;

use crate::config::{Config, DEFAULT_DESKTOP_UA, DEFAULT_MOBILE_UA};

/// Default web origin the content pages are fetched from.
pub const DEFAULT_BASE_URL: &str = "https://www.instagram.com";

/// Simulated browser identity attached to a fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientProfile {
    Desktop,
    Mobile,
}

/// One fetch attempt: a URL variant paired with a browser identity.
/// `json_hint` marks the variant that asks the platform for a
/// machine-readable response instead of markup.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    pub url: String,
    pub profile: ClientProfile,
    pub json_hint: bool,
}

/// A successfully fetched and decoded content page.
#[derive(Debug)]
pub struct PageResponse {
    pub url_final: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body_raw: Bytes,
    /// Body decoded to UTF-8 using the detected charset.
    pub body: String,
    pub content_type: String,
    pub fetched_at: DateTime<Utc>,
}

/// The page plus which attempt produced it, kept for diagnostics.
#[derive(Debug)]
pub struct FetchOutcome {
    pub page: PageResponse,
    pub attempt: FetchAttempt,
    /// Zero-based position of the winning attempt in the ordered list.
    pub index: usize,
}

/// Settings threaded into the resolver and its fetch layer. Never held as
/// global state; construct once and pass by value.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Web origin content pages are fetched from. Overridable so tests and
    /// proxy users can point the resolver at a different host.
    pub base_url: String,
    /// Bound on each individual fetch attempt.
    pub timeout: Duration,
    pub desktop_user_agent: String,
    pub mobile_user_agent: String,
}

impl FetchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(config.timeout_secs()),
            desktop_user_agent: config.desktop_user_agent().to_string(),
            mobile_user_agent: config.mobile_user_agent().to_string(),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            desktop_user_agent: DEFAULT_DESKTOP_UA.to_string(),
            mobile_user_agent: DEFAULT_MOBILE_UA.to_string(),
        }
    }
}
