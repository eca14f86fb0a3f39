use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VeritasError;
use crate::quality::{FAKE_THRESHOLD, RELIABLE_THRESHOLD};

// --- Request Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Url,
    Image,
    Video,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Text => write!(f, "text"),
            ContentType::Url => write!(f, "url"),
            ContentType::Image => write!(f, "image"),
            ContentType::Video => write!(f, "video"),
        }
    }
}

impl FromStr for ContentType {
    type Err = VeritasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(ContentType::Text),
            "url" => Ok(ContentType::Url),
            "image" => Ok(ContentType::Image),
            "video" => Ok(ContentType::Video),
            other => Err(VeritasError::InvalidRequest(format!(
                "unknown content type: {other}"
            ))),
        }
    }
}

/// One unit of work for the scoring engine. The variant decides which payload
/// is meaningful, so a text request can never carry a stray URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "contentType", rename_all = "snake_case")]
pub enum AnalysisRequest {
    Text { content: String },
    Url { url: String },
    Image { url: String },
    Video { url: String },
}

impl AnalysisRequest {
    pub fn text(content: impl Into<String>) -> Self {
        AnalysisRequest::Text {
            content: content.into(),
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        AnalysisRequest::Url { url: url.into() }
    }

    /// Build a request from loosely-typed API fields, rejecting combinations
    /// where the payload required by `content_type` is missing or blank.
    pub fn from_parts(
        content_type: ContentType,
        content: Option<&str>,
        url: Option<&str>,
    ) -> Result<Self, VeritasError> {
        fn present(value: Option<&str>) -> Option<String> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        }

        let missing =
            |field: &str| VeritasError::InvalidRequest(format!("{content_type} requires `{field}`"));

        match content_type {
            ContentType::Text => present(content)
                .map(|content| AnalysisRequest::Text { content })
                .ok_or_else(|| missing("content")),
            ContentType::Url => present(url)
                .map(|url| AnalysisRequest::Url { url })
                .ok_or_else(|| missing("url")),
            ContentType::Image => present(url)
                .map(|url| AnalysisRequest::Image { url })
                .ok_or_else(|| missing("url")),
            ContentType::Video => present(url)
                .map(|url| AnalysisRequest::Video { url })
                .ok_or_else(|| missing("url")),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            AnalysisRequest::Text { .. } => ContentType::Text,
            AnalysisRequest::Url { .. } => ContentType::Url,
            AnalysisRequest::Image { .. } => ContentType::Image,
            AnalysisRequest::Video { .. } => ContentType::Video,
        }
    }

    /// The text or URL the request is about.
    pub fn subject(&self) -> &str {
        match self {
            AnalysisRequest::Text { content } => content,
            AnalysisRequest::Url { url }
            | AnalysisRequest::Image { url }
            | AnalysisRequest::Video { url } => url,
        }
    }
}

// --- Factor Types ---

/// Well-known markers attached to a FeatureSet depending on the pipeline path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum FactorFlag {
    /// Input was rejected before scoring.
    Irrelevant,
    /// Domain resolved to a trusted source.
    KnownSource,
    /// Domain matches a free blog-hosting pattern.
    SuspiciousDomain,
    /// Page could not be fetched.
    Inaccessible,
    /// Image/video stub path.
    ImageAnalysis,
}

/// Normalized heuristic factors, each in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    pub sensationalism: f64,
    pub emotional_language: f64,
    pub clickbait_indicators: f64,
    pub source_mention: f64,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub flags: BTreeSet<FactorFlag>,
    /// Open extension map for factors that have no dedicated field yet.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, f64>,
}

impl FeatureSet {
    pub fn flagged(flag: FactorFlag) -> Self {
        Self::default().with_flag(flag)
    }

    pub fn with_flag(mut self, flag: FactorFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn has_flag(&self, flag: FactorFlag) -> bool {
        self.flags.contains(&flag)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PoliticalBias {
    /// Political leaning is not computed; every verdict reports neutral.
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BiasIndicators {
    pub political_bias: PoliticalBias,
    pub sensational_words: Vec<String>,
    pub emotional_words: Vec<String>,
}

// --- Classifier Types ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Map a sentiment model's output label. Models disagree on naming
    /// (`positive`, `POS`, `LABEL_2`), so several spellings are accepted.
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" | "pos" | "label_2" => Some(SentimentLabel::Positive),
            "neutral" | "neu" | "label_1" => Some(SentimentLabel::Neutral),
            "negative" | "neg" | "label_0" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierResult {
    /// Reliability leaning in `[0, 1]`.
    pub ml_score: f64,
    /// Max of the competing reliable/fake probabilities.
    pub ml_confidence: f64,
    pub sentiment_label: SentimentLabel,
    pub top_classification: String,
}

// --- Trusted Sources ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrustedSourceRecord {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub country: String,
    pub language: String,
    pub reliability_score: f64,
    #[serde(default)]
    pub is_verified: bool,
}

impl TrustedSourceRecord {
    /// Host of the record's URL without a leading `www.`.
    pub fn host(&self) -> Option<String> {
        normalized_host(&self.url).ok()
    }
}

/// Extract the lowercased hostname of a URL and strip a leading `www.`
/// (e.g. "https://www.lemonde.fr/a" -> "lemonde.fr"). Bare domains without a
/// scheme are accepted.
pub fn normalized_host(raw: &str) -> Result<String, VeritasError> {
    let trimmed = raw.trim();
    let parsed = match url::Url::parse(trimmed) {
        Ok(u) => u,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(&format!("https://{trimmed}"))?
        }
        Err(e) => return Err(e.into()),
    };
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(VeritasError::InvalidUrl(url::ParseError::EmptyHost))?
        .to_lowercase();
    Ok(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

// --- Scraped Content ---

/// Text pulled out of a fetched HTML page, boilerplate already removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub description: String,
    pub body_text: String,
}

impl ScrapedPage {
    /// Title, description and body joined into the text that gets scored.
    pub fn scoring_text(&self) -> String {
        [&self.title, &self.description, &self.body_text]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A trusted outlet suggested for manually cross-checking a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckMatch {
    pub source: String,
    pub url: String,
    pub search_url: String,
    pub relevance: f64,
}

// --- Verdict ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum VerdictLabel {
    #[serde(rename = "fiable")]
    Fiable,
    #[serde(rename = "douteux")]
    Douteux,
    #[serde(rename = "faux")]
    Faux,
    #[serde(rename = "non pertinent")]
    NonPertinent,
}

impl VerdictLabel {
    /// Label implied by a score: >= 75 fiable, <= 35 faux, douteux in between.
    pub fn for_score(score: f64) -> Self {
        if score >= RELIABLE_THRESHOLD {
            VerdictLabel::Fiable
        } else if score <= FAKE_THRESHOLD {
            VerdictLabel::Faux
        } else {
            VerdictLabel::Douteux
        }
    }
}

impl std::fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictLabel::Fiable => write!(f, "fiable"),
            VerdictLabel::Douteux => write!(f, "douteux"),
            VerdictLabel::Faux => write!(f, "faux"),
            VerdictLabel::NonPertinent => write!(f, "non pertinent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    /// Raw lexicon sum before normalization.
    pub sentiment_score: i32,
    pub word_count: usize,
    pub sentence_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub url: String,
    pub domain: String,
    pub title: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerdictDetails {
    pub source_reliability: Option<f64>,
    pub issues_detected: Vec<String>,
    pub recommendations: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_metrics: Option<TextMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TrustedSourceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageSummary>,
}

/// Final, immutable outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    /// `[0, 100]`, two decimals.
    pub score: f64,
    pub verdict: VerdictLabel,
    pub explanation: String,
    pub factors: FeatureSet,
    pub bias_indicators: BiasIndicators,
    pub confidence_score: f64,
    pub analysis_time_ms: u64,
    pub details: VerdictDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierResult>,
}

impl Verdict {
    /// True when the label agrees with the score thresholds.
    pub fn label_matches_score(&self) -> bool {
        self.verdict == VerdictLabel::for_score(self.score)
    }
}
