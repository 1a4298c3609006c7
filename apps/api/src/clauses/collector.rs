use serde::Serialize;
use tracing::{info, warn};

use super::fetcher::PageFetcher;
use super::scrape::{page_paragraphs, reference_clauses};
use super::{FetchError, REFERENCE_FETCH_POLICY, SOURCE_URL_FETCH_POLICY};
use crate::models::sow::{ClauseOrigin, ExampleClause};

/// Caller choices for which clause sources feed a generation.
#[derive(Debug, Clone)]
pub struct ClauseSources {
    pub include_reference: bool,
    /// Zero-based indices into the reference examples. `None` keeps them all.
    pub reference_selection: Option<Vec<usize>>,
    pub pasted: Option<String>,
    pub source_url: Option<String>,
}

impl Default for ClauseSources {
    fn default() -> Self {
        Self {
            include_reference: true,
            reference_selection: None,
            pasted: None,
            source_url: None,
        }
    }
}

/// Reference-site examples plus a notice when the page yielded none.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceExamples {
    pub source_url: String,
    pub clauses: Vec<ExampleClause>,
    pub notice: Option<String>,
}

/// Ordered clause sequence for the prompt, plus anything the caller should be told.
#[derive(Debug, Clone, Default)]
pub struct CollectedClauses {
    pub clauses: Vec<ExampleClause>,
    pub notices: Vec<String>,
}

/// Scrapes the reference site. Failure to fetch propagates.
///
/// Zero matches is not an error but is reported through `notice`, since it
/// usually means the site's markup changed or the request was blocked.
pub async fn fetch_reference_clauses(
    fetcher: &dyn PageFetcher,
    url: &str,
) -> Result<ReferenceExamples, FetchError> {
    let texts = match fetcher.fetch_html(url).await {
        Ok(html) => reference_clauses(&html)?,
        Err(e) => vec![REFERENCE_FETCH_POLICY.on_failure(url, e)?],
    };

    let notice = if texts.is_empty() {
        warn!("Reference page {url} matched no clause bodies");
        Some(format!(
            "No example clauses were found at {url}; the page layout may have changed."
        ))
    } else {
        None
    };

    Ok(ReferenceExamples {
        source_url: url.to_string(),
        clauses: texts
            .into_iter()
            .map(|t| ExampleClause::new(ClauseOrigin::ReferenceSite, t))
            .collect(),
        notice,
    })
}

/// Scrapes up to ten paragraphs from a caller-supplied URL into one clause.
///
/// Under `SOURCE_URL_FETCH_POLICY` a fetch or parse error becomes a
/// placeholder clause, so this only returns `Err` if that policy changes.
pub async fn fetch_url_clause(
    fetcher: &dyn PageFetcher,
    url: &str,
) -> Result<ExampleClause, FetchError> {
    let fetched = match fetcher.fetch_html(url).await {
        Ok(html) => page_paragraphs(&html),
        Err(e) => Err(e),
    };
    let text = match fetched {
        Ok(text) => text,
        Err(e) => SOURCE_URL_FETCH_POLICY.on_failure(url, e)?,
    };
    Ok(ExampleClause::new(ClauseOrigin::UrlFetched, text))
}

/// Builds the ordered clause sequence: selected reference clauses, then pasted
/// text, then the URL clause.
pub async fn collect_clauses(
    fetcher: &dyn PageFetcher,
    reference_url: &str,
    sources: &ClauseSources,
) -> Result<CollectedClauses, FetchError> {
    let mut collected = CollectedClauses::default();

    if sources.include_reference {
        let reference = fetch_reference_clauses(fetcher, reference_url).await?;
        collected.notices.extend(reference.notice);
        let available = reference.clauses.len();

        match &sources.reference_selection {
            None => collected.clauses.extend(reference.clauses),
            Some(selection) => {
                let ignored: Vec<String> = selection
                    .iter()
                    .filter(|&&index| index >= available)
                    .map(|index| index.to_string())
                    .collect();
                collected.clauses.extend(
                    reference
                        .clauses
                        .into_iter()
                        .enumerate()
                        .filter(|(index, _)| selection.contains(index))
                        .map(|(_, clause)| clause),
                );
                if !ignored.is_empty() {
                    warn!(
                        "Ignoring reference selection {:?}; only {available} examples available",
                        ignored
                    );
                    collected.notices.push(format!(
                        "Reference example(s) {} not available; {available} were found.",
                        ignored.join(", ")
                    ));
                }
            }
        }
    }

    if let Some(pasted) = sources.pasted.as_deref().map(str::trim) {
        if !pasted.is_empty() {
            collected
                .clauses
                .push(ExampleClause::new(ClauseOrigin::Pasted, pasted));
        }
    }

    if let Some(url) = sources.source_url.as_deref().map(str::trim) {
        if !url.is_empty() {
            collected.clauses.push(fetch_url_clause(fetcher, url).await?);
        }
    }

    info!(
        "Collected {} example clauses ({} notices)",
        collected.clauses.len(),
        collected.notices.len()
    );
    Ok(collected)
}
