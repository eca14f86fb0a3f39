// Trait abstractions for the scoring engine's external collaborators.
//
// PageFetcher: HTML retrieval + boilerplate stripping.
// TrustedSourceStore: read-only lookup of administrator-curated sources.
// TextClassifier: hosted zero-shot and sentiment models.
//
// The analyzer only sees these traits, so tests run against the mocks in
// `testing` with no network.

use anyhow::Result;
use async_trait::async_trait;

use inference_client::{InferenceClient, LabelScore, ZeroShotOutput};
use veritas_common::{ScrapedPage, TrustedSourceRecord};
use veritas_fetch::HttpPageFetcher;

use crate::sources::SourceFilter;

// ---------------------------------------------------------------------------
// PageFetcher
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and return its title, description and main text.
    async fn fetch(&self, url: &str) -> Result<ScrapedPage>;
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<ScrapedPage> {
        Ok(HttpPageFetcher::fetch(self, url).await?)
    }
}

// ---------------------------------------------------------------------------
// TrustedSourceStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TrustedSourceStore: Send + Sync {
    /// Best stored record whose host contains, or is contained in, `domain`.
    async fn find_by_domain(&self, domain: &str) -> Result<Option<TrustedSourceRecord>>;

    /// Records matching `filter`, most reliable first.
    async fn list(&self, filter: &SourceFilter) -> Result<Vec<TrustedSourceRecord>>;
}

// ---------------------------------------------------------------------------
// TextClassifier
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn zero_shot(&self, text: &str, labels: &[&str]) -> Result<ZeroShotOutput>;

    async fn sentiment(&self, text: &str) -> Result<Vec<LabelScore>>;
}

#[async_trait]
impl TextClassifier for InferenceClient {
    async fn zero_shot(&self, text: &str, labels: &[&str]) -> Result<ZeroShotOutput> {
        Ok(InferenceClient::zero_shot(self, text, labels).await?)
    }

    async fn sentiment(&self, text: &str) -> Result<Vec<LabelScore>> {
        Ok(InferenceClient::sentiment(self, text).await?)
    }
}
