/// Scores at or above this value are labelled `fiable`.
pub const RELIABLE_THRESHOLD: f64 = 75.0;

/// Scores at or below this value are labelled `faux`.
pub const FAKE_THRESHOLD: f64 = 35.0;

/// Neutral starting point of the heuristic score before adjustments.
pub const BASE_HEURISTIC_SCORE: f64 = 50.0;

/// Heuristic weights applied to the normalized factors.
pub const SENSATIONALISM_WEIGHT: f64 = 25.0;
pub const EMOTIONAL_LANGUAGE_WEIGHT: f64 = 15.0;
pub const CLICKBAIT_WEIGHT: f64 = 20.0;
pub const SOURCE_MENTION_WEIGHT: f64 = 20.0;

/// Points removed when the page lives on a free blog-hosting domain.
pub const SUSPICIOUS_DOMAIN_PENALTY: f64 = 20.0;

/// Fixed score of a page that could not be fetched or parsed.
pub const FETCH_FAILURE_SCORE: f64 = 30.0;

/// Fixed score of image/video requests, which are not analysed yet.
pub const MEDIA_STUB_SCORE: f64 = 50.0;

/// Trusted sources land in `[TRUSTED_SCORE_FLOOR, TRUSTED_SCORE_FLOOR + TRUSTED_JITTER_SPAN]`.
/// The span stays under 5 so two-decimal rounding never reaches 100.
pub const TRUSTED_SCORE_FLOOR: f64 = 95.0;
pub const TRUSTED_JITTER_SPAN: f64 = 4.99;

/// Reliability prior when nothing is known about a domain. Not a penalty.
pub const NEUTRAL_SOURCE_RELIABILITY: f64 = 0.5;

/// Reliability given to domains matched by the authoritative suffix list.
pub const AUTHORITATIVE_RELIABILITY: f64 = 0.95;

/// Confidence reported when only local heuristics contributed.
pub const HEURISTIC_CONFIDENCE: f64 = 0.5;

/// Explanation warnings fire above (or, for sources, below) these factor values.
pub const SENSATIONALISM_WARN: f64 = 0.3;
pub const EMOTIONAL_LANGUAGE_WARN: f64 = 0.5;
pub const CLICKBAIT_WARN: f64 = 0.3;
pub const SOURCE_MENTION_WARN: f64 = 0.5;

/// Below this score the explanation closes with a sharing recommendation.
pub const RECOMMENDATION_THRESHOLD: f64 = 50.0;

/// Round to two decimals, the precision scores are reported with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clamp a score into `[0, 100]`.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
