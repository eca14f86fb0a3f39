//! Lexical feature extraction.
//!
//! Everything here is a pure function of the input text: no network, no
//! randomness. The same text always yields the same factors and score.

use std::sync::LazyLock;

use regex::Regex;
use veritas_common::{
    clamp_score, BiasIndicators, FeatureSet, TextMetrics, BASE_HEURISTIC_SCORE, CLICKBAIT_WEIGHT,
    EMOTIONAL_LANGUAGE_WEIGHT, SENSATIONALISM_WEIGHT, SOURCE_MENTION_WEIGHT,
};

use crate::lexicon::{valence, SENSATIONAL_WORDS, SOURCE_KEYWORDS};

/// Runs of 4+ uppercase letters ("INCROYABLE", "URGENT").
static SHOUTING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Lu}{4,}").expect("valid regex"));
static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?…]+").expect("valid regex"));

/// Value of `sourceMention` when an attribution cue is present.
const SOURCE_MENTION_PRESENT: f64 = 0.8;

/// Output of the extractor: factors plus the intermediate signals the
/// explanation and verdict details are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicAnalysis {
    pub factors: FeatureSet,
    pub bias: BiasIndicators,
    pub metrics: TextMetrics,
    /// Heuristic reliability in `[0, 100]`, before any classifier blend.
    pub score: f64,
}

pub fn extract(text: &str) -> HeuristicAnalysis {
    let lowered = text.to_lowercase();

    let (sentiment_score, emotional_words) = lexical_sentiment(&lowered);
    let sensational_words = sensational_hits(&lowered);
    let shouting_runs = SHOUTING_RE.find_iter(text).count();
    let cites_source = SOURCE_KEYWORDS.iter().any(|k| lowered.contains(k));

    let factors = FeatureSet {
        sensationalism: ratio(sensational_words.len(), 3.0),
        emotional_language: ratio(sentiment_score.unsigned_abs() as usize, 10.0),
        clickbait_indicators: ratio(shouting_runs, 5.0),
        source_mention: if cites_source { SOURCE_MENTION_PRESENT } else { 0.0 },
        ..FeatureSet::default()
    };

    let score = heuristic_score(&factors);

    HeuristicAnalysis {
        bias: BiasIndicators {
            sensational_words,
            emotional_words,
            ..BiasIndicators::default()
        },
        metrics: TextMetrics {
            sentiment_score,
            word_count: text.split_whitespace().count(),
            sentence_count: sentence_count(text),
        },
        factors,
        score,
    }
}

/// 50-point base, sensational tone and shouting pull down, citations pull up.
pub fn heuristic_score(factors: &FeatureSet) -> f64 {
    let score = BASE_HEURISTIC_SCORE
        - factors.sensationalism * SENSATIONALISM_WEIGHT
        - factors.emotional_language * EMOTIONAL_LANGUAGE_WEIGHT
        - factors.clickbait_indicators * CLICKBAIT_WEIGHT
        + factors.source_mention * SOURCE_MENTION_WEIGHT;
    clamp_score(score)
}

/// Sum of lexicon weights over the tokens of already-lowercased text, plus the
/// distinct words that contributed.
pub fn lexical_sentiment(lowered: &str) -> (i32, Vec<String>) {
    let mut total = 0;
    let mut words: Vec<String> = Vec::new();

    for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
        if let Some(weight) = valence(token) {
            total += weight;
            if !words.iter().any(|w| w == token) {
                words.push(token.to_string());
            }
        }
    }

    (total, words)
}

fn sensational_hits(lowered: &str) -> Vec<String> {
    SENSATIONAL_WORDS
        .iter()
        .filter(|w| lowered.contains(*w))
        .map(|w| w.to_string())
        .collect()
}

fn sentence_count(text: &str) -> usize {
    SENTENCE_END_RE
        .split(text)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
}

/// `min(count / saturation, 1)`.
fn ratio(count: usize, saturation: f64) -> f64 {
    (count as f64 / saturation).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENSATIONAL: &str = "INCROYABLE ! Un complot mondial révélé, selon une étude choquante.";

    #[test]
    fn sensational_example_factors() {
        let analysis = extract(SENSATIONAL);
        let f = &analysis.factors;

        // incroyable, complot, choquant
        assert_eq!(f.sensationalism, 1.0);
        // one uppercase run
        assert!((f.clickbait_indicators - 0.2).abs() < 1e-9);
        assert_eq!(f.source_mention, 0.8);
        // incroyable +3, complot -2, choquante -2
        assert_eq!(analysis.metrics.sentiment_score, -1);
        assert!((f.emotional_language - 0.1).abs() < 1e-9);

        assert!((analysis.score - 35.5).abs() < 1e-9);
        assert!(analysis.score < 50.0);
    }

    #[test]
    fn bias_indicators_list_matched_words() {
        let analysis = extract(SENSATIONAL);
        assert_eq!(
            analysis.bias.sensational_words,
            vec!["choquant", "incroyable", "complot"]
        );
        assert_eq!(
            analysis.bias.emotional_words,
            vec!["incroyable", "complot", "choquante"]
        );
    }

    #[test]
    fn neutral_text_keeps_base_score() {
        let analysis = extract("Le conseil municipal se réunit mardi pour voter le budget annuel.");
        assert_eq!(analysis.factors.sensationalism, 0.0);
        assert_eq!(analysis.factors.clickbait_indicators, 0.0);
        assert_eq!(analysis.factors.source_mention, 0.0);
        assert_eq!(analysis.score, 50.0);
    }

    #[test]
    fn cited_calm_text_scores_above_base() {
        let analysis = extract("Selon l'INSEE, le chômage a reculé de 0,2 point au troisième trimestre.");
        assert_eq!(analysis.factors.source_mention, 0.8);
        // "INSEE" is one shouting run: 50 + 16 - 4
        assert!((analysis.score - 62.0).abs() < 1e-9);
    }

    #[test]
    fn factors_saturate_at_one() {
        let text = "URGENT SCANDALE HONTEUX TERRIFIANT CATASTROPHE DRAMATIQUE EXCLUSIF";
        let analysis = extract(text);
        assert_eq!(analysis.factors.sensationalism, 1.0);
        assert_eq!(analysis.factors.clickbait_indicators, 1.0);
        assert_eq!(analysis.factors.emotional_language, 1.0);
        // 50 - 25 - 15 - 20
        assert_eq!(analysis.score, 0.0);
    }

    #[test]
    fn extraction_is_deterministic() {
        assert_eq!(extract(SENSATIONAL), extract(SENSATIONAL));
    }

    #[test]
    fn metrics_count_words_and_sentences() {
        let analysis = extract("Première phrase. Deuxième phrase! Troisième?");
        assert_eq!(analysis.metrics.word_count, 5);
        assert_eq!(analysis.metrics.sentence_count, 3);
    }

    #[test]
    fn score_is_clamped() {
        let factors = FeatureSet {
            source_mention: 10.0,
            ..FeatureSet::default()
        };
        assert_eq!(heuristic_score(&factors), 100.0);
    }
}
