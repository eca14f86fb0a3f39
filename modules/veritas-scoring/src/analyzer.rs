//! The `analyze` pipeline.
//!
//! Gatekeeper → trusted-source resolver (short-circuit) → page fetch →
//! content gate → heuristics + classifier → verdict. Every step that can fail
//! maps to a terminal verdict, so `analyze` itself never returns an error.
//! Dropping the returned future cancels any in-flight fetch or classifier call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use inference_client::InferenceClient;
use tracing::{info, warn};
use typed_builder::TypedBuilder;
use veritas_common::{
    normalized_host, AnalysisRequest, Config, FactCheckMatch, PageSummary, ScrapedPage, Verdict,
};
use veritas_fetch::HttpPageFetcher;

use crate::classifier::ClassifierAdapter;
use crate::cross_check::cross_check;
use crate::gatekeeper::{Gatekeeper, Rejection};
use crate::heuristics;
use crate::jitter::{JitterSource, ThreadJitter};
use crate::sources::{is_free_blog_host, InMemorySourceStore, TrustResolution, TrustedSourceResolver};
use crate::traits::{PageFetcher, TextClassifier, TrustedSourceStore};
use crate::util::truncate_chars;
use crate::verdict::{self, ScoredInput};

/// Scraped text beyond this many characters is not scored.
pub const MAX_SCORED_CHARS: usize = 2000;

/// Length of the body excerpt attached to URL verdicts.
pub const EXCERPT_CHARS: usize = 500;

/// Collaborators and tunables for an [`Analyzer`].
#[derive(Clone, TypedBuilder)]
pub struct AnalyzerDeps {
    pub fetcher: Arc<dyn PageFetcher>,
    pub store: Arc<dyn TrustedSourceStore>,
    /// `None` runs heuristics only.
    #[builder(default)]
    pub classifier: Option<Arc<dyn TextClassifier>>,
    #[builder(default = Duration::from_secs(10))]
    pub fetch_timeout: Duration,
    #[builder(default = Duration::from_secs(15))]
    pub classifier_timeout: Duration,
    #[builder(default = Arc::new(ThreadJitter) as Arc<dyn JitterSource>)]
    pub jitter: Arc<dyn JitterSource>,
    #[builder(default)]
    pub gatekeeper: Gatekeeper,
}

impl AnalyzerDeps {
    /// Production wiring: HTTP fetcher, TOML-seeded store, and the hosted
    /// classifier when an API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpPageFetcher::new(config.fetch_timeout, &config.user_agent)?;

        let store = match &config.trusted_sources_path {
            Some(path) => InMemorySourceStore::from_file(path)?,
            None => InMemorySourceStore::default(),
        };
        let classifier: Option<Arc<dyn TextClassifier>> = match &config.hf_api_key {
            Some(key) => Some(Arc::new(InferenceClient::new(
                &config.inference_base_url,
                key,
                &config.zero_shot_model,
                &config.sentiment_model,
                config.classifier_timeout,
            )?)),
            None => None,
        };
        info!(
            sources = store.len(),
            classifier_enabled = config.classifier_enabled(),
            "Analyzer dependencies ready"
        );

        Ok(Self::builder()
            .fetcher(Arc::new(fetcher))
            .store(Arc::new(store))
            .classifier(classifier)
            .fetch_timeout(config.fetch_timeout)
            .classifier_timeout(config.classifier_timeout)
            .build())
    }
}

pub struct Analyzer {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn TrustedSourceStore>,
    resolver: TrustedSourceResolver,
    classifier: ClassifierAdapter,
    gatekeeper: Gatekeeper,
    jitter: Arc<dyn JitterSource>,
    fetch_timeout: Duration,
}

impl Analyzer {
    pub fn new(deps: AnalyzerDeps) -> Self {
        let classifier = match deps.classifier {
            Some(c) => ClassifierAdapter::new(c, deps.classifier_timeout),
            None => ClassifierAdapter::disabled(),
        };

        if !classifier.is_enabled() {
            info!("No text classifier configured, scoring with heuristics only");
        }

        Self {
            resolver: TrustedSourceResolver::new(deps.store.clone()),
            fetcher: deps.fetcher,
            store: deps.store,
            classifier,
            gatekeeper: deps.gatekeeper,
            jitter: deps.jitter,
            fetch_timeout: deps.fetch_timeout,
        }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Verdict {
        let started = Instant::now();

        let mut verdict = match request {
            AnalysisRequest::Text { content } => self.analyze_text(content).await,
            AnalysisRequest::Url { url } => self.analyze_url(url).await,
            AnalysisRequest::Image { .. } | AnalysisRequest::Video { .. } => {
                verdict::media_stub(request.content_type())
            }
        };

        verdict.analysis_time_ms = started.elapsed().as_millis() as u64;
        info!(
            content_type = %request.content_type(),
            score = verdict.score,
            verdict = %verdict.verdict,
            elapsed_ms = verdict.analysis_time_ms,
            "Analysis complete"
        );
        verdict
    }

    /// Gatekeeper URL check on its own, without fetching anything.
    pub fn check_url(&self, url: &str) -> std::result::Result<(), Rejection> {
        self.gatekeeper.validate_url(url)
    }

    pub async fn verify_source(&self, url: &str) -> TrustResolution {
        self.resolver.verify_source(url).await
    }

    /// Trusted outlets to verify `claim` against.
    pub async fn cross_check(&self, claim: &str) -> Vec<FactCheckMatch> {
        cross_check(self.store.as_ref(), self.jitter.as_ref(), claim).await
    }

    async fn analyze_text(&self, text: &str) -> Verdict {
        let heuristics = heuristics::extract(text);
        let classifier = self.classifier.classify(text).await;

        verdict::scored(ScoredInput {
            heuristics,
            classifier,
            suspicious_domain: false,
            source_reliability: None,
            page: None,
        })
    }

    async fn analyze_url(&self, url: &str) -> Verdict {
        if let Err(rejection) = self.gatekeeper.validate_url(url) {
            info!(url, reason = %rejection, "URL rejected");
            return verdict::rejected(&rejection);
        }

        let resolution = self.resolver.verify_source(url).await;
        if resolution.is_trusted {
            info!(url, reliability = resolution.reliability_score, "Trusted source, skipping fetch");
            return verdict::trusted(&resolution, self.jitter.next_unit());
        }

        let page = match self.fetch(url).await {
            Ok(page) => page,
            Err(message) => {
                warn!(url, error = %message, "Page fetch failed");
                return verdict::fetch_failed(&message, Some(resolution.reliability_score));
            }
        };

        let full_text = page.scoring_text();
        if let Err(rejection) = self.gatekeeper.validate_content(&full_text) {
            info!(url, reason = %rejection, "Scraped content rejected");
            return verdict::rejected(&rejection);
        }

        let text = truncate_chars(&full_text, MAX_SCORED_CHARS);
        let heuristics = heuristics::extract(text);
        let classifier = self.classifier.classify(text).await;

        let domain = normalized_host(url).unwrap_or_default();
        let suspicious_domain = is_free_blog_host(&domain);

        verdict::scored(ScoredInput {
            heuristics,
            classifier,
            suspicious_domain,
            source_reliability: Some(resolution.reliability_score),
            page: Some(PageSummary {
                url: url.to_string(),
                excerpt: truncate_chars(page.body_text.trim(), EXCERPT_CHARS).to_string(),
                title: page.title,
                domain,
            }),
        })
    }

    /// Fetch bounded by the configured timeout. The error is the message shown
    /// in the verdict.
    async fn fetch(&self, url: &str) -> std::result::Result<ScrapedPage, String> {
        match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(url)).await {
            Ok(Ok(page)) => Ok(page),
            Ok(Err(e)) => Err(format!("{e:#}")),
            Err(_) => Err(format!(
                "délai d'attente dépassé après {} ms",
                self.fetch_timeout.as_millis()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{calm_article, page, MockFetcher};
    use veritas_common::VerdictLabel;

    fn analyzer(fetcher: MockFetcher) -> Analyzer {
        Analyzer::new(
            AnalyzerDeps::builder()
                .fetcher(Arc::new(fetcher))
                .store(Arc::new(InMemorySourceStore::default()))
                .build(),
        )
    }

    #[tokio::test]
    async fn text_request_is_scored() {
        let v = analyzer(MockFetcher::new())
            .analyze(&AnalysisRequest::text("Le conseil municipal se réunit mardi."))
            .await;
        assert_eq!(v.score, 50.0);
        assert_eq!(v.verdict, VerdictLabel::Douteux);
        assert!(v.classifier.is_none());
    }

    #[tokio::test]
    async fn url_summary_has_domain_and_excerpt() {
        let url = "https://www.example.com/article";
        let body = format!("{}\n{}", calm_article(), "Suite. ".repeat(200));
        let fetcher = MockFetcher::new().on_page(url, page(url, "Chômage en baisse", &body));

        let v = analyzer(fetcher).analyze(&AnalysisRequest::url(url)).await;
        let summary = v.details.page.unwrap();
        assert_eq!(summary.domain, "example.com");
        assert_eq!(summary.title, "Chômage en baisse");
        assert_eq!(summary.excerpt.chars().count(), EXCERPT_CHARS);
        assert_eq!(v.details.source_reliability, Some(0.5));
    }

    #[test]
    fn check_url_delegates_to_gatekeeper() {
        let a = analyzer(MockFetcher::new());
        assert!(a.check_url("https://example.com/a").is_ok());
        assert!(a.check_url("https://example.com/a.pdf").is_err());
    }
}
