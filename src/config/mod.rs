//! Configuration handling for the application.
//!
//! Defaults are chosen so the tool works out of the box; every knob can be
//! overridden through environment variables, and the CLI layers its own
//! flags on top. The resulting `Config` is passed explicitly into the
//! resolver; nothing here is process-global.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Environment variable names. Keeping them public lets tests and callers
/// refer to them directly.
pub const ENV_OUTPUT_DIR: &str = "REELGRAB_OUTPUT_DIR";
pub const ENV_TIMEOUT_SECS: &str = "REELGRAB_TIMEOUT_SECS";
pub const ENV_DESKTOP_UA: &str = "REELGRAB_DESKTOP_UA";
pub const ENV_MOBILE_UA: &str = "REELGRAB_MOBILE_UA";

/// Default values used when environment variables are absent.
const DEFAULT_OUTPUT_DIR: &str = ".";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Desktop browser identity sent on the primary fetch attempts.
pub const DEFAULT_DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Mobile browser identity used by the fallback fetch attempts.
pub const DEFAULT_MOBILE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) \
AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    output_dir: String,
    timeout_secs: u64,
    desktop_user_agent: String,
    mobile_user_agent: String,
}

impl Config {
    /// Create a new config explicitly.
    pub fn new(
        output_dir: impl Into<String>,
        timeout_secs: u64,
        desktop_user_agent: impl Into<String>,
        mobile_user_agent: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            timeout_secs,
            desktop_user_agent: desktop_user_agent.into(),
            mobile_user_agent: mobile_user_agent.into(),
        }
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let output_dir =
            env::var(ENV_OUTPUT_DIR).unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string());
        let timeout_secs = match env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                field: ENV_TIMEOUT_SECS,
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_TIMEOUT_SECS,
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        let desktop_user_agent =
            env::var(ENV_DESKTOP_UA).unwrap_or_else(|_| DEFAULT_DESKTOP_UA.to_string());
        let mobile_user_agent =
            env::var(ENV_MOBILE_UA).unwrap_or_else(|_| DEFAULT_MOBILE_UA.to_string());
        Ok(Self {
            output_dir,
            timeout_secs,
            desktop_user_agent,
            mobile_user_agent,
        })
    }

    /// Directory downloads are written to unless the CLI overrides it.
    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }
    /// Per-request timeout in seconds for page fetch attempts.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
    /// User-Agent string for the desktop browser identity.
    pub fn desktop_user_agent(&self) -> &str {
        &self.desktop_user_agent
    }
    /// User-Agent string for the mobile browser identity.
    pub fn mobile_user_agent(&self) -> &str {
        &self.mobile_user_agent
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_OUTPUT_DIR,
            DEFAULT_TIMEOUT_SECS,
            DEFAULT_DESKTOP_UA,
            DEFAULT_MOBILE_UA,
        )
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
