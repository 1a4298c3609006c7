use std::sync::Arc;

use crate::clauses::PageFetcher;
use crate::config::Config;
use crate::llm_client::CompletionModel;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is immutable or internally `Send + Sync`; no request writes to it.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Default: `LlmClient` against the configured base URL.
    pub llm: Arc<dyn CompletionModel>,
    /// Pluggable page fetcher used by the clause collector. Default: `HttpFetcher`.
    pub fetcher: Arc<dyn PageFetcher>,
    pub config: Config,
}
