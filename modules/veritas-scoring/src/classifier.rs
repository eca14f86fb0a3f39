//! Optional machine-learned opinion layered on top of the heuristics.
//!
//! The adapter never fails: a missing credential, a network error or a timeout
//! all yield `None` and scoring continues with heuristics alone.

use std::sync::Arc;
use std::time::Duration;

use inference_client::{LabelScore, ZeroShotOutput};
use tracing::{debug, warn};
use veritas_common::{ClassifierResult, SentimentLabel};

use crate::traits::TextClassifier;
use crate::util::truncate_chars;

pub const RELIABLE_LABEL: &str = "reliable fact-based news";
pub const FAKE_LABEL: &str = "fake news formulation";

/// Zero-shot candidate labels, in the order they are sent.
pub const CANDIDATE_LABELS: [&str; 4] = [RELIABLE_LABEL, FAKE_LABEL, "emotional opinion", "satire"];

/// Only the head of the text is sent upstream.
pub const MAX_CLASSIFIER_CHARS: usize = 512;

#[derive(Clone)]
pub struct ClassifierAdapter {
    classifier: Option<Arc<dyn TextClassifier>>,
    timeout: Duration,
}

impl ClassifierAdapter {
    pub fn new(classifier: Arc<dyn TextClassifier>, timeout: Duration) -> Self {
        Self {
            classifier: Some(classifier),
            timeout,
        }
    }

    /// Adapter with no backing service; `classify` always returns `None`.
    pub fn disabled() -> Self {
        Self {
            classifier: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.classifier.is_some()
    }

    pub async fn classify(&self, text: &str) -> Option<ClassifierResult> {
        let classifier = self.classifier.as_ref()?;
        let input = truncate_chars(text, MAX_CLASSIFIER_CHARS);

        // Sentiment is requested alongside zero-shot, but only zero-shot is
        // required for a result.
        let (zero_shot, sentiment) = tokio::join!(
            tokio::time::timeout(self.timeout, classifier.zero_shot(input, &CANDIDATE_LABELS)),
            tokio::time::timeout(self.timeout, classifier.sentiment(input)),
        );

        let output = match zero_shot {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(error = %e, "Zero-shot classification failed, using heuristics only");
                return None;
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Zero-shot classification timed out, using heuristics only"
                );
                return None;
            }
        };

        if !carries_decision_labels(&output) {
            warn!(
                labels = ?output.labels,
                "Zero-shot reply lacks the reliable/fake labels, using heuristics only"
            );
            return None;
        }

        let sentiment_label = match sentiment {
            Ok(Ok(scores)) => top_sentiment(&scores),
            Ok(Err(e)) => {
                debug!(error = %e, "Sentiment request failed, defaulting to neutral");
                SentimentLabel::Neutral
            }
            Err(_) => {
                debug!("Sentiment request timed out, defaulting to neutral");
                SentimentLabel::Neutral
            }
        };

        let (ml_score, ml_confidence) = derive_ml_score(&output);
        let result = ClassifierResult {
            ml_score,
            ml_confidence,
            sentiment_label,
            top_classification: output.top_label().unwrap_or_default().to_string(),
        };

        debug!(
            ml_score = result.ml_score,
            ml_confidence = result.ml_confidence,
            top = %result.top_classification,
            "Classifier result"
        );
        Some(result)
    }
}

/// A reply is usable only if it scores at least one of the two labels the
/// ML score is derived from.
pub fn carries_decision_labels(output: &ZeroShotOutput) -> bool {
    output.score(RELIABLE_LABEL).is_some() || output.score(FAKE_LABEL).is_some()
}

/// `(mlScore, mlConfidence)` from the zero-shot probabilities. A text leaning
/// "fake" scores `1 - P(fake)`, otherwise `P(reliable)`.
pub fn derive_ml_score(output: &ZeroShotOutput) -> (f64, f64) {
    let reliable = output.score_of(RELIABLE_LABEL);
    let fake = output.score_of(FAKE_LABEL);

    let ml_score = if fake > reliable { 1.0 - fake } else { reliable };
    (ml_score.clamp(0.0, 1.0), reliable.max(fake).clamp(0.0, 1.0))
}

/// Highest-scoring recognized label. Unknown labels are skipped.
pub fn top_sentiment(scores: &[LabelScore]) -> SentimentLabel {
    scores
        .iter()
        .filter_map(|s| SentimentLabel::from_model_label(&s.label).map(|label| (label, s.score)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(label, _)| label)
        .unwrap_or_default()
}

/// 50/50 average of the heuristic score and the classifier's opinion.
pub fn blend(heuristic_score: f64, ml_score: f64) -> f64 {
    (heuristic_score + ml_score * 100.0) / 2.0
}
