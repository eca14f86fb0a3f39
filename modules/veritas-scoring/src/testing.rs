// Test mocks for the scoring engine.
//
// One mock per trait boundary:
// - MockFetcher (PageFetcher): HashMap-based URL→page or error, optional delay
// - MockClassifier (TextClassifier): fixed zero-shot/sentiment output, call counting
// - FailingSourceStore (TrustedSourceStore): every query errors
//
// Plus helpers for building TrustedSourceRecord, ScrapedPage and ZeroShotOutput.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use inference_client::{LabelScore, ZeroShotOutput};
use veritas_common::{ScrapedPage, TrustedSourceRecord};

use crate::sources::SourceFilter;
use crate::traits::{PageFetcher, TextClassifier, TrustedSourceStore};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// HashMap-based page fetcher. Returns `Err` for unregistered URLs.
/// Builder pattern: `.on_page()`, `.on_error()`, `.with_delay()`.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, ScrapedPage>,
    errors: HashMap<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(mut self, url: &str, page: ScrapedPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn on_error(mut self, url: &str, message: &str) -> Self {
        self.errors.insert(url.to_string(), message.to_string());
        self
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<ScrapedPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.errors.get(url) {
            bail!("{message}");
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockFetcher: no page registered for {url}"))
    }
}

// ---------------------------------------------------------------------------
// MockClassifier
// ---------------------------------------------------------------------------

/// Returns the same zero-shot and sentiment output for every text.
pub struct MockClassifier {
    zero_shot: Option<ZeroShotOutput>,
    sentiment: Option<Vec<LabelScore>>,
    delay: Option<Duration>,
    zero_shot_calls: AtomicUsize,
    last_input: Mutex<Option<String>>,
}

impl MockClassifier {
    pub fn new(zero_shot: ZeroShotOutput) -> Self {
        Self {
            zero_shot: Some(zero_shot),
            sentiment: Some(vec![LabelScore {
                label: "neutral".to_string(),
                score: 1.0,
            }]),
            delay: None,
            zero_shot_calls: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        }
    }

    /// Classifier whose every request fails.
    pub fn failing() -> Self {
        Self {
            zero_shot: None,
            sentiment: None,
            ..Self::new(zero_shot_output(&[]))
        }
    }

    pub fn with_sentiment(mut self, scores: &[(&str, f64)]) -> Self {
        self.sentiment = Some(
            scores
                .iter()
                .map(|(label, score)| LabelScore {
                    label: label.to_string(),
                    score: *score,
                })
                .collect(),
        );
        self
    }

    pub fn failing_sentiment(mut self) -> Self {
        self.sentiment = None;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn zero_shot_calls(&self) -> usize {
        self.zero_shot_calls.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextClassifier for MockClassifier {
    async fn zero_shot(&self, text: &str, _labels: &[&str]) -> Result<ZeroShotOutput> {
        self.zero_shot_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(text.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.zero_shot {
            Some(output) => Ok(output.clone()),
            None => bail!("MockClassifier: zero-shot unavailable"),
        }
    }

    async fn sentiment(&self, _text: &str) -> Result<Vec<LabelScore>> {
        match &self.sentiment {
            Some(scores) => Ok(scores.clone()),
            None => bail!("MockClassifier: sentiment unavailable"),
        }
    }
}

// ---------------------------------------------------------------------------
// FailingSourceStore
// ---------------------------------------------------------------------------

pub struct FailingSourceStore;

#[async_trait]
impl TrustedSourceStore for FailingSourceStore {
    async fn find_by_domain(&self, _domain: &str) -> Result<Option<TrustedSourceRecord>> {
        bail!("FailingSourceStore: store offline")
    }

    async fn list(&self, _filter: &SourceFilter) -> Result<Vec<TrustedSourceRecord>> {
        bail!("FailingSourceStore: store offline")
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A verified French press record.
pub fn trusted_record(name: &str, url: &str, reliability: f64) -> TrustedSourceRecord {
    TrustedSourceRecord {
        name: name.to_string(),
        url: url.to_string(),
        description: None,
        category: "presse".to_string(),
        country: "France".to_string(),
        language: "fr".to_string(),
        reliability_score: reliability,
        is_verified: true,
    }
}

pub fn page(url: &str, title: &str, body: &str) -> ScrapedPage {
    ScrapedPage {
        url: url.to_string(),
        title: title.to_string(),
        description: String::new(),
        body_text: body.to_string(),
    }
}

/// Zero-shot output from `(label, score)` pairs, sorted by descending score.
pub fn zero_shot_output(pairs: &[(&str, f64)]) -> ZeroShotOutput {
    let mut pairs: Vec<(String, f64)> = pairs.iter().map(|(l, s)| (l.to_string(), *s)).collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    let (labels, scores) = pairs.into_iter().unzip();
    ZeroShotOutput { labels, scores }
}

/// Calm, sourced prose long enough to pass the content gate.
pub fn calm_article() -> String {
    [
        "Selon le rapport annuel publié mardi par l'institut national de la statistique,",
        "le taux de chômage a légèrement reculé au cours du troisième trimestre.",
        "Les auteurs de l'étude précisent que cette évolution reste modeste et",
        "qu'elle varie sensiblement d'une région à l'autre du territoire.",
    ]
    .join("\n")
}
