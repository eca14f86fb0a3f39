//! Shortlist of trusted outlets to manually verify a claim against.
//!
//! No search is performed: each entry carries a site-restricted search link
//! and a placeholder relevance. Best-effort, never fails.

use tracing::{debug, warn};
use url::Url;
use veritas_common::{normalized_host, FactCheckMatch};

use crate::jitter::JitterSource;
use crate::sources::SourceFilter;
use crate::traits::TrustedSourceStore;

pub const MAX_CROSS_CHECK_SOURCES: usize = 5;

const SEARCH_ENDPOINT: &str = "https://www.google.com/search";
const BASE_RELEVANCE: f64 = 0.6;
const RELEVANCE_SPAN: f64 = 0.3;

pub async fn cross_check(
    store: &dyn TrustedSourceStore,
    jitter: &dyn JitterSource,
    claim: &str,
) -> Vec<FactCheckMatch> {
    let sources = match store.list(&SourceFilter::verified()).await {
        Ok(sources) => sources,
        Err(e) => {
            warn!(error = %e, "Cross-check skipped, trusted source listing failed");
            return Vec::new();
        }
    };

    let claim = claim.trim();
    let mut matches: Vec<FactCheckMatch> = sources
        .into_iter()
        .take(MAX_CROSS_CHECK_SOURCES)
        .filter_map(|source| {
            let host = match normalized_host(&source.url) {
                Ok(host) => host,
                Err(e) => {
                    debug!(source = %source.name, error = %e, "Skipping source with bad URL");
                    return None;
                }
            };
            let query = format!("{claim} site:{host}");
            let search_url = Url::parse_with_params(SEARCH_ENDPOINT, &[("q", query.as_str())]).ok()?;

            Some(FactCheckMatch {
                source: source.name,
                url: source.url,
                search_url: search_url.to_string(),
                relevance: BASE_RELEVANCE + RELEVANCE_SPAN * jitter.next_unit(),
            })
        })
        .collect();

    matches.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    matches
}
