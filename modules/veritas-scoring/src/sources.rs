//! Trusted-source lookup: the curated store plus the static list of
//! authoritative domains.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};
use veritas_common::{
    config::load_trusted_sources, normalized_host, TrustedSourceRecord,
    AUTHORITATIVE_RELIABILITY, NEUTRAL_SOURCE_RELIABILITY,
};

use crate::traits::TrustedSourceStore;

/// Domain suffixes trusted without a stored record: international
/// organisations, public research, government and education TLDs, wire
/// services and national outlets.
pub const AUTHORITATIVE_DOMAINS: &[&str] = &[
    "unesco.org",
    "un.org",
    "who.int",
    "europa.eu",
    "gov",
    "edu",
    "gouv.fr",
    "nasa.gov",
    "cnrs.fr",
    "inserm.fr",
    "nature.com",
    "science.org",
    "bbc.com",
    "bbc.co.uk",
    "reuters.com",
    "afp.com",
    "apnews.com",
    "france24.com",
    "lemonde.fr",
    "lefigaro.fr",
    "radiofrance.fr",
    "francetvinfo.fr",
];

/// Free blog-hosting platforms. Pages on these lose points.
pub const FREE_BLOG_HOSTS: &[&str] = &[
    "wordpress.com",
    "blogspot.com",
    "over-blog.com",
    "wixsite.com",
    "weebly.com",
    "tumblr.com",
];

/// `domain` equals `suffix` or is a subdomain of it.
fn matches_suffix(domain: &str, suffix: &str) -> bool {
    domain == suffix || domain.ends_with(&format!(".{suffix}"))
}

pub fn is_authoritative(domain: &str) -> bool {
    AUTHORITATIVE_DOMAINS.iter().any(|d| matches_suffix(domain, d))
}

pub fn is_free_blog_host(domain: &str) -> bool {
    FREE_BLOG_HOSTS.iter().any(|d| matches_suffix(domain, d))
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Listing filter. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFilter {
    pub category: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub verified: Option<bool>,
}

impl SourceFilter {
    pub fn verified() -> Self {
        Self {
            verified: Some(true),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &TrustedSourceRecord) -> bool {
        fn eq(want: &Option<String>, have: &str) -> bool {
            want.as_deref().map_or(true, |w| w.eq_ignore_ascii_case(have))
        }

        eq(&self.category, &record.category)
            && eq(&self.country, &record.country)
            && eq(&self.language, &record.language)
            && self.verified.map_or(true, |v| v == record.is_verified)
    }
}

// ---------------------------------------------------------------------------
// InMemorySourceStore
// ---------------------------------------------------------------------------

/// Read-only store over a fixed set of records, most reliable first.
#[derive(Debug, Clone, Default)]
pub struct InMemorySourceStore {
    records: Vec<TrustedSourceRecord>,
}

impl InMemorySourceStore {
    pub fn new(mut records: Vec<TrustedSourceRecord>) -> Self {
        records.sort_by(|a, b| b.reliability_score.total_cmp(&a.reliability_score));
        Self { records }
    }

    /// Load records from a TOML file with `[[sources]]` entries.
    pub fn from_file(path: &Path) -> Result<Self> {
        let records = load_trusted_sources(path)?;
        debug!(path = %path.display(), count = records.len(), "Loaded trusted sources");
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct countries, sorted.
    pub fn countries(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[async_trait]
impl TrustedSourceStore for InMemorySourceStore {
    async fn find_by_domain(&self, domain: &str) -> Result<Option<TrustedSourceRecord>> {
        let domain = domain.trim().to_lowercase();
        if domain.is_empty() {
            return Ok(None);
        }

        // Substring match in both directions, so "lemonde.fr" finds a record
        // stored as "https://www.lemonde.fr" and "news.bbc.co.uk" finds "bbc.co.uk".
        let found = self.records.iter().find(|record| match record.host() {
            Some(host) if !host.is_empty() => host.contains(&domain) || domain.contains(&host),
            _ => false,
        });
        Ok(found.cloned())
    }

    async fn list(&self, filter: &SourceFilter) -> Result<Vec<TrustedSourceRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// TrustedSourceResolver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TrustResolution {
    pub is_trusted: bool,
    pub source: Option<TrustedSourceRecord>,
    pub reliability_score: f64,
}

impl TrustResolution {
    fn untrusted() -> Self {
        Self {
            is_trusted: false,
            source: None,
            reliability_score: NEUTRAL_SOURCE_RELIABILITY,
        }
    }
}

/// Maps a URL's domain to a stored record, then to the authoritative list.
/// Never fails: anything that goes wrong resolves to "not trusted".
#[derive(Clone)]
pub struct TrustedSourceResolver {
    store: Arc<dyn TrustedSourceStore>,
}

impl TrustedSourceResolver {
    pub fn new(store: Arc<dyn TrustedSourceStore>) -> Self {
        Self { store }
    }

    pub async fn verify_source(&self, url: &str) -> TrustResolution {
        let domain = match normalized_host(url) {
            Ok(d) => d,
            Err(e) => {
                debug!(url, error = %e, "Unparseable URL, treating as untrusted");
                return TrustResolution::untrusted();
            }
        };

        match self.store.find_by_domain(&domain).await {
            Ok(Some(record)) => {
                debug!(domain = %domain, source = %record.name, "Matched stored trusted source");
                return TrustResolution {
                    is_trusted: true,
                    reliability_score: record.reliability_score,
                    source: Some(record),
                };
            }
            Ok(None) => {}
            Err(e) => warn!(domain = %domain, error = %e, "Trusted source lookup failed"),
        }

        if is_authoritative(&domain) {
            debug!(domain = %domain, "Matched authoritative domain");
            return TrustResolution {
                is_trusted: true,
                source: Some(authoritative_record(&domain)),
                reliability_score: AUTHORITATIVE_RELIABILITY,
            };
        }

        TrustResolution::untrusted()
    }
}

fn authoritative_record(domain: &str) -> TrustedSourceRecord {
    TrustedSourceRecord {
        name: domain.to_string(),
        url: format!("https://{domain}"),
        description: None,
        category: "authoritative".to_string(),
        country: "international".to_string(),
        language: "multi".to_string(),
        reliability_score: AUTHORITATIVE_RELIABILITY,
        is_verified: true,
    }
}
