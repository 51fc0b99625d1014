pub mod direct;
pub mod embedded;
pub mod errors;
pub mod model;
pub mod shapes;

#[cfg(test)]
mod tests;

pub use errors::ExtractError;
pub use model::{MediaFields, MediaPost};

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::diagnostics::DebugSink;
use crate::extractor::embedded::EmbeddedPattern;
use crate::fetcher::{FetchOutcome, FetchSettings, PageFetcher};

/// How much of a page body is copied into a diagnostic report.
const BODY_PREFIX_LIMIT: usize = 16 * 1024;

/// Resolves a shortcode to a playable media URL plus metadata.
///
/// Holds no cross-call mutable state; concurrent `resolve` calls are safe
/// by construction. All tunables arrive through [`FetchSettings`].
pub struct MediaResolver {
    fetcher: PageFetcher,
    settings: FetchSettings,
}

impl MediaResolver {
    pub fn new(settings: FetchSettings) -> Result<Self, crate::fetcher::FetchError> {
        let fetcher = PageFetcher::new(&settings)?;
        Ok(Self { fetcher, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Fetch the content page and run the extraction cascade.
    ///
    /// Structured-data extraction is tried first; the raw-pattern fallback
    /// only runs when no embedded document parses. Failures are terminal
    /// for this call; there is no internal retry beyond the fixed fetch
    /// attempt list.
    #[instrument(skip_all, fields(shortcode = %shortcode))]
    pub async fn resolve(
        &self,
        shortcode: &str,
        sink: Option<&DebugSink>,
    ) -> Result<MediaPost, ExtractError> {
        let outcome = self
            .fetcher
            .negotiate(&self.settings.base_url, shortcode)
            .await?;

        match self.structured_document(&outcome) {
            Some((doc, pattern)) => {
                debug!(pattern = %pattern, "structured document extracted");
                match shapes::resolve_fields(&doc) {
                    Some((fields, shape)) => {
                        debug!(shape = ?shape, "media resolved from structured data");
                        Ok(MediaPost::assemble(shortcode, fields))
                    }
                    None => {
                        if let Some(sink) = sink {
                            let pretty = serde_json::to_string_pretty(&doc)
                                .unwrap_or_else(|_| doc.to_string());
                            sink.write(&format!("{shortcode}_document"), &pretty);
                        }
                        Err(ExtractError::NoMediaFound {
                            shortcode: shortcode.to_string(),
                            context: format!(
                                "structured document ({pattern}) matched no field shape"
                            ),
                        })
                    }
                }
            }
            None => match direct::scan(&outcome.page.body) {
                Some(fields) => {
                    debug!("media resolved from direct url pattern");
                    Ok(MediaPost::assemble(shortcode, fields))
                }
                None => {
                    if let Some(sink) = sink {
                        sink.write(
                            &format!("{shortcode}_page"),
                            &failure_report(&outcome),
                        );
                    }
                    Err(ExtractError::NoMediaFound {
                        shortcode: shortcode.to_string(),
                        context: "no embedded document or direct media pattern matched"
                            .to_string(),
                    })
                }
            },
        }
    }

    /// Step B: ready-made JSON body for the machine-readable variant,
    /// otherwise the embedded-document pattern scan.
    fn structured_document(&self, outcome: &FetchOutcome) -> Option<(Value, EmbeddedPattern)> {
        if outcome.attempt.json_hint && outcome.page.content_type.contains("application/json") {
            match serde_json::from_str(&outcome.page.body) {
                Ok(doc) => return Some((doc, EmbeddedPattern::JsonBody)),
                Err(e) => {
                    warn!(error = %e, "machine-readable response did not parse as json");
                    return None;
                }
            }
        }
        embedded::scan(&outcome.page.body)
    }
}

/// Response headers plus a bounded body prefix, for the diagnostics sink.
fn failure_report(outcome: &FetchOutcome) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "attempt #{} {} ({:?})\nstatus: {}\n\n",
        outcome.index + 1,
        outcome.attempt.url,
        outcome.attempt.profile,
        outcome.page.status
    ));
    for (name, value) in outcome.page.headers.iter() {
        report.push_str(&format!("{}: {}\n", name, value.to_str().unwrap_or("<binary>")));
    }
    report.push('\n');
    report.extend(outcome.page.body.chars().take(BODY_PREFIX_LIMIT));
    report
}
