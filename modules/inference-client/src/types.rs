use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ZeroShotRequest<'a> {
    pub inputs: &'a str,
    pub parameters: ZeroShotParameters<'a>,
    pub options: RequestOptions,
}

#[derive(Debug, Serialize)]
pub(crate) struct ZeroShotParameters<'a> {
    pub candidate_labels: &'a [&'a str],
    pub multi_label: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct TextRequest<'a> {
    pub inputs: &'a str,
    pub options: RequestOptions,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestOptions {
    pub wait_for_model: bool,
}

/// One label with its probability.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Zero-shot output: parallel `labels`/`scores`, sorted by descending score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZeroShotOutput {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ZeroShotOutput {
    /// Probability assigned to `label`, if the reply carries it.
    pub fn score(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.scores.get(i).copied())
    }

    /// Probability assigned to `label`, 0 when the label is absent.
    pub fn score_of(&self, label: &str) -> f64 {
        self.score(label).unwrap_or(0.0)
    }

    pub fn top_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

/// The legacy inference API answers zero-shot with parallel arrays, the
/// router API with a list of `{label, score}`. Both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ZeroShotWire {
    Parallel { labels: Vec<String>, scores: Vec<f64> },
    Pairs(Vec<LabelScore>),
}

impl From<ZeroShotWire> for ZeroShotOutput {
    fn from(wire: ZeroShotWire) -> Self {
        let mut pairs: Vec<(String, f64)> = match wire {
            ZeroShotWire::Parallel { labels, scores } => labels.into_iter().zip(scores).collect(),
            ZeroShotWire::Pairs(pairs) => pairs.into_iter().map(|p| (p.label, p.score)).collect(),
        };
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (labels, scores) = pairs.into_iter().unzip();
        ZeroShotOutput { labels, scores }
    }
}

/// Text-classification output is nested one level per input on some
/// deployments (`[[{..}]]`) and flat on others (`[{..}]`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SentimentWire {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl From<SentimentWire> for Vec<LabelScore> {
    fn from(wire: SentimentWire) -> Self {
        match wire {
            SentimentWire::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            SentimentWire::Flat(scores) => scores,
        }
    }
}
