use crate::fetcher::types::{ClientProfile, FetchAttempt};

/// Query hint asking the platform for a machine-readable response.
pub const JSON_HINT_QUERY: &str = "__a=1&__d=dis";

/// Build the ordered fetch attempts for a shortcode.
///
/// The canonical post URL is tried first with a desktop identity, then the
/// reel variant, then the canonical URL again with a mobile identity, and
/// finally the reel variant with the machine-readable query hint. The
/// order is fixed; later attempts only run when earlier ones fail.
pub fn build_attempts(base_url: &str, shortcode: &str) -> Vec<FetchAttempt> {
    let base = base_url.trim_end_matches('/');
    vec![
        FetchAttempt {
            url: format!("{base}/p/{shortcode}/"),
            profile: ClientProfile::Desktop,
            json_hint: false,
        },
        FetchAttempt {
            url: format!("{base}/reel/{shortcode}/"),
            profile: ClientProfile::Desktop,
            json_hint: false,
        },
        FetchAttempt {
            url: format!("{base}/p/{shortcode}/"),
            profile: ClientProfile::Mobile,
            json_hint: false,
        },
        FetchAttempt {
            url: format!("{base}/reel/{shortcode}/?{JSON_HINT_QUERY}"),
            profile: ClientProfile::Mobile,
            json_hint: true,
        },
    ]
}
