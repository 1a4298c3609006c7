//! Clause Collector: gathers example clauses from the reference site, pasted
//! text and a caller-supplied URL.
//!
//! The two network sources fail differently, and that difference is an
//! explicit `FetchPolicy` rather than an accident of where errors get caught:
//! the reference site propagates, the caller's URL degrades to a placeholder.

pub mod collector;
pub mod fetcher;
pub mod scrape;

use thiserror::Error;
use tracing::warn;

pub use collector::{collect_clauses, fetch_reference_clauses, ClauseSources};
pub use fetcher::{HttpFetcher, PageFetcher};

/// Reference page scraped for sample scope-of-work clauses.
pub const REFERENCE_CLAUSES_URL: &str = "https://www.lawinsider.com/clause/scope-of-work";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },
}

/// What happens when an external page cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Fail the whole request.
    Propagate,
    /// Substitute a visible placeholder clause and carry on.
    Placeholder,
}

/// Reference-site failures abort generation.
pub const REFERENCE_FETCH_POLICY: FetchPolicy = FetchPolicy::Propagate;
/// Caller-URL failures become a placeholder clause.
pub const SOURCE_URL_FETCH_POLICY: FetchPolicy = FetchPolicy::Placeholder;

impl FetchPolicy {
    /// Resolves a failed fetch of `url` into clause text or an error.
    pub fn on_failure(self, url: &str, err: FetchError) -> Result<String, FetchError> {
        match self {
            FetchPolicy::Propagate => Err(err),
            FetchPolicy::Placeholder => {
                warn!("Fetching {url} failed, substituting placeholder: {err}");
                Ok(placeholder_text(&err))
            }
        }
    }
}

/// The clause text injected in place of a page that could not be fetched.
pub fn placeholder_text(err: &FetchError) -> String {
    format!("[Error fetching URL content: {err}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector_error() -> FetchError {
        FetchError::Selector {
            selector: "p[".to_string(),
            reason: "unexpected end".to_string(),
        }
    }

    #[test]
    fn test_placeholder_policy_swallows_error() {
        let text = FetchPolicy::Placeholder
            .on_failure("https://example.com", selector_error())
            .unwrap();
        assert_eq!(
            text,
            "[Error fetching URL content: invalid selector 'p[': unexpected end]"
        );
    }

    #[test]
    fn test_propagate_policy_returns_error() {
        let result = FetchPolicy::Propagate.on_failure("https://example.com", selector_error());
        assert!(matches!(result, Err(FetchError::Selector { .. })));
    }

    #[test]
    fn test_sources_keep_their_distinct_policies() {
        assert_eq!(REFERENCE_FETCH_POLICY, FetchPolicy::Propagate);
        assert_eq!(SOURCE_URL_FETCH_POLICY, FetchPolicy::Placeholder);
    }
}
