//! Verdict synthesis: one constructor per terminal state of an analysis.

use veritas_common::{
    clamp_score, round2, BiasIndicators, ClassifierResult, ContentType, FactorFlag, FeatureSet,
    PageSummary, Verdict, VerdictDetails, VerdictLabel, CLICKBAIT_WARN,
    EMOTIONAL_LANGUAGE_WARN, FETCH_FAILURE_SCORE, HEURISTIC_CONFIDENCE, MEDIA_STUB_SCORE,
    RECOMMENDATION_THRESHOLD, RELIABLE_THRESHOLD, SENSATIONALISM_WARN, SOURCE_MENTION_WARN,
    SUSPICIOUS_DOMAIN_PENALTY, TRUSTED_JITTER_SPAN, TRUSTED_SCORE_FLOOR,
};

use crate::classifier::blend;
use crate::gatekeeper::Rejection;
use crate::heuristics::HeuristicAnalysis;
use crate::sources::TrustResolution;

const ISSUE_SENSATIONALISM: &str = "langage sensationnaliste";
const ISSUE_EMOTIONAL: &str = "ton émotionnel excessif";
const ISSUE_NO_SOURCES: &str = "absence de sources";
const ISSUE_CLICKBAIT: &str = "techniques de clickbait";
const ISSUE_BLOG_HOST: &str = "hébergement de blog gratuit";
const ISSUE_INACCESSIBLE: &str = "contenu inaccessible";

/// Everything the scored path needs once extraction (and optionally
/// classification) has run.
#[derive(Debug, Clone)]
pub struct ScoredInput {
    pub heuristics: HeuristicAnalysis,
    pub classifier: Option<ClassifierResult>,
    pub suspicious_domain: bool,
    pub source_reliability: Option<f64>,
    pub page: Option<PageSummary>,
}

/// Gatekeeper refusal: `non pertinent`, score 0, the reason as explanation.
pub fn rejected(reason: &Rejection) -> Verdict {
    let explanation = reason.to_string();
    Verdict {
        score: 0.0,
        verdict: VerdictLabel::NonPertinent,
        factors: FeatureSet::flagged(FactorFlag::Irrelevant),
        bias_indicators: BiasIndicators::default(),
        confidence_score: 0.0,
        analysis_time_ms: 0,
        details: VerdictDetails {
            source_reliability: None,
            issues_detected: vec![explanation.clone()],
            recommendations: recommendation_for(VerdictLabel::NonPertinent).to_string(),
            ..VerdictDetails::default()
        },
        explanation,
        classifier: None,
    }
}

/// Trusted-source short-circuit. `jitter` is in `[0, 1)` and only spreads the
/// score over `[95, 100)` for display.
pub fn trusted(resolution: &TrustResolution, jitter: f64) -> Verdict {
    let score = round2(TRUSTED_SCORE_FLOOR + jitter.clamp(0.0, 1.0) * TRUSTED_JITTER_SPAN);
    let name = resolution
        .source
        .as_ref()
        .map(|s| s.name.as_str())
        .unwrap_or("source reconnue");

    Verdict {
        score,
        verdict: VerdictLabel::Fiable,
        explanation: format!(
            "Cette source est répertoriée comme fiable dans notre base de données : {name}"
        ),
        factors: FeatureSet::flagged(FactorFlag::KnownSource),
        bias_indicators: BiasIndicators::default(),
        confidence_score: resolution.reliability_score,
        analysis_time_ms: 0,
        details: VerdictDetails {
            source_reliability: Some(resolution.reliability_score),
            issues_detected: Vec::new(),
            recommendations: recommendation_for(VerdictLabel::Fiable).to_string(),
            source: resolution.source.clone(),
            ..VerdictDetails::default()
        },
        classifier: None,
    }
}

/// The page could not be retrieved. Degraded, never an error.
pub fn fetch_failed(error: &str, source_reliability: Option<f64>) -> Verdict {
    Verdict {
        score: FETCH_FAILURE_SCORE,
        verdict: VerdictLabel::Douteux,
        explanation: format!("Impossible d'analyser le contenu de l'URL : {error}"),
        factors: FeatureSet::flagged(FactorFlag::Inaccessible),
        bias_indicators: BiasIndicators::default(),
        confidence_score: 0.0,
        analysis_time_ms: 0,
        details: VerdictDetails {
            source_reliability,
            issues_detected: vec![ISSUE_INACCESSIBLE.to_string()],
            recommendations: recommendation_for(VerdictLabel::Douteux).to_string(),
            ..VerdictDetails::default()
        },
        classifier: None,
    }
}

/// Image and video analysis is not implemented; a fixed neutral verdict.
pub fn media_stub(content_type: ContentType) -> Verdict {
    let medium = match content_type {
        ContentType::Video => "vidéos",
        _ => "images",
    };
    Verdict {
        score: MEDIA_STUB_SCORE,
        verdict: VerdictLabel::for_score(MEDIA_STUB_SCORE),
        explanation: format!(
            "L'analyse des {medium} nécessite une intégration avec des services spécialisés. \
             Cette fonctionnalité est en cours de développement."
        ),
        factors: FeatureSet::flagged(FactorFlag::ImageAnalysis),
        bias_indicators: BiasIndicators::default(),
        confidence_score: 0.0,
        analysis_time_ms: 0,
        details: VerdictDetails {
            recommendations: recommendation_for(VerdictLabel::Douteux).to_string(),
            ..VerdictDetails::default()
        },
        classifier: None,
    }
}

/// Heuristics, optional classifier blend, domain penalty, thresholds.
pub fn scored(input: ScoredInput) -> Verdict {
    let ScoredInput {
        heuristics,
        classifier,
        suspicious_domain,
        source_reliability,
        page,
    } = input;

    let mut factors = heuristics.factors;
    let mut score = match &classifier {
        Some(c) => blend(heuristics.score, c.ml_score),
        None => heuristics.score,
    };
    if suspicious_domain {
        score -= SUSPICIOUS_DOMAIN_PENALTY;
        factors = factors.with_flag(FactorFlag::SuspiciousDomain);
    }
    let score = round2(clamp_score(score));
    let label = VerdictLabel::for_score(score);

    Verdict {
        score,
        verdict: label,
        explanation: explain(score, &factors, classifier.as_ref()),
        bias_indicators: heuristics.bias,
        confidence_score: classifier
            .as_ref()
            .map(|c| c.ml_confidence)
            .unwrap_or(HEURISTIC_CONFIDENCE),
        analysis_time_ms: 0,
        details: VerdictDetails {
            source_reliability,
            issues_detected: issues_for(&factors),
            recommendations: recommendation_for(label).to_string(),
            text_metrics: Some(heuristics.metrics),
            source: None,
            page,
        },
        factors,
        classifier,
    }
}

/// Deterministic in `(score, factors, classifier)`.
pub fn explain(score: f64, factors: &FeatureSet, classifier: Option<&ClassifierResult>) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(
        if score >= RELIABLE_THRESHOLD {
            "Cette information semble fiable. Elle présente les caractéristiques d'un contenu de qualité, avec un ton mesuré et des sources mentionnées."
        } else if score >= RECOMMENDATION_THRESHOLD {
            "Cette information est douteuse. Elle présente certains signaux d'alerte qui justifient une vérification croisée."
        } else {
            "Cette information semble peu fiable."
        }
        .to_string(),
    );

    if let Some(c) = classifier {
        parts.push(format!(
            "L'analyse automatique classe ce texte comme « {} » avec une confiance de {:.0} %.",
            c.top_classification,
            c.ml_confidence * 100.0
        ));
    }

    let issues = issues_for(factors);
    if !issues.is_empty() {
        parts.push(format!("Signaux détectés : {}.", issues.join(", ")));
    }

    if score < RECOMMENDATION_THRESHOLD {
        parts.push(
            "Nous recommandons de ne pas la partager sans vérification approfondie.".to_string(),
        );
    }

    parts.join(" ")
}

/// Heuristic warnings triggered by `factors`, in a fixed order.
pub fn issues_for(factors: &FeatureSet) -> Vec<String> {
    let mut issues = Vec::new();
    if factors.sensationalism > SENSATIONALISM_WARN {
        issues.push(ISSUE_SENSATIONALISM);
    }
    if factors.emotional_language > EMOTIONAL_LANGUAGE_WARN {
        issues.push(ISSUE_EMOTIONAL);
    }
    if factors.source_mention < SOURCE_MENTION_WARN {
        issues.push(ISSUE_NO_SOURCES);
    }
    if factors.clickbait_indicators > CLICKBAIT_WARN {
        issues.push(ISSUE_CLICKBAIT);
    }
    if factors.has_flag(FactorFlag::SuspiciousDomain) {
        issues.push(ISSUE_BLOG_HOST);
    }
    issues.into_iter().map(String::from).collect()
}

pub fn recommendation_for(label: VerdictLabel) -> &'static str {
    match label {
        VerdictLabel::Fiable => {
            "Contenu a priori fiable. Vérifiez tout de même la date et le contexte de publication."
        }
        VerdictLabel::Douteux => {
            "Croisez cette information avec d'autres sources reconnues avant de la partager."
        }
        VerdictLabel::Faux => {
            "Ne partagez pas ce contenu sans l'avoir vérifié auprès de sources fiables."
        }
        VerdictLabel::NonPertinent => {
            "Soumettez un article de presse ou un texte d'information pour obtenir une analyse."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::extract;
    use crate::testing::trusted_record;
    use veritas_common::SentimentLabel;

    const SENSATIONAL: &str = "INCROYABLE ! Un complot mondial révélé, selon une étude choquante.";

    fn classifier(ml_score: f64, ml_confidence: f64) -> ClassifierResult {
        ClassifierResult {
            ml_score,
            ml_confidence,
            sentiment_label: SentimentLabel::Negative,
            top_classification: "fake news formulation".to_string(),
        }
    }

    fn input(text: &str) -> ScoredInput {
        ScoredInput {
            heuristics: extract(text),
            classifier: None,
            suspicious_domain: false,
            source_reliability: None,
            page: None,
        }
    }

    #[test]
    fn rejection_verdict() {
        let v = rejected(&Rejection::BlockedHost("github.com".into()));
        assert_eq!(v.verdict, VerdictLabel::NonPertinent);
        assert_eq!(v.score, 0.0);
        assert_eq!(v.confidence_score, 0.0);
        assert_eq!(v.explanation, Rejection::BlockedHost("github.com".into()).to_string());
        assert!(v.factors.has_flag(FactorFlag::Irrelevant));
    }

    #[test]
    fn trusted_verdict_stays_in_band() {
        let resolution = TrustResolution {
            is_trusted: true,
            source: Some(trusted_record("Le Monde", "https://www.lemonde.fr", 0.9)),
            reliability_score: 0.9,
        };
        for jitter in [0.0, 0.5, 0.999_999] {
            let v = trusted(&resolution, jitter);
            assert_eq!(v.verdict, VerdictLabel::Fiable);
            assert!(v.score >= 95.0 && v.score < 100.0, "score {}", v.score);
            assert!(v.explanation.ends_with("Le Monde"));
        }
        assert_eq!(trusted(&resolution, 0.0).score, 95.0);
    }

    #[test]
    fn fetch_failure_carries_error() {
        let v = fetch_failed("connection refused", Some(0.5));
        assert_eq!(v.verdict, VerdictLabel::Douteux);
        assert_eq!(v.score, 30.0);
        assert!(v.explanation.contains("connection refused"));
        assert!(v.factors.has_flag(FactorFlag::Inaccessible));
    }

    #[test]
    fn media_stub_is_neutral() {
        let v = media_stub(ContentType::Image);
        assert_eq!(v.score, 50.0);
        assert_eq!(v.verdict, VerdictLabel::Douteux);
        assert_eq!(v.confidence_score, 0.0);
        assert!(v.factors.has_flag(FactorFlag::ImageAnalysis));
        assert!(media_stub(ContentType::Video).explanation.contains("vidéos"));
    }

    #[test]
    fn sensational_text_is_not_reliable() {
        let v = scored(input(SENSATIONAL));
        assert_eq!(v.score, 35.5);
        assert_eq!(v.verdict, VerdictLabel::Douteux);
        assert_eq!(v.confidence_score, HEURISTIC_CONFIDENCE);
        assert!(v.label_matches_score());
        assert!(v.explanation.starts_with("Cette information semble peu fiable."));
        assert!(v.explanation.contains(ISSUE_SENSATIONALISM));
        assert!(v.explanation.ends_with("vérification approfondie."));
        assert_eq!(v.details.text_metrics.as_ref().unwrap().sentiment_score, -1);
    }

    #[test]
    fn classifier_blend_and_confidence() {
        let mut scored_input = input(SENSATIONAL);
        scored_input.classifier = Some(classifier(0.2, 0.8));
        let v = scored(scored_input);
        // (35.5 + 20) / 2
        assert_eq!(v.score, 27.75);
        assert_eq!(v.verdict, VerdictLabel::Faux);
        assert_eq!(v.confidence_score, 0.8);
        assert!(v.explanation.contains("confiance de 80 %"));
    }

    #[test]
    fn blog_penalty_applies_after_blend() {
        let mut scored_input = input("Selon l'INSEE, le chômage a reculé de 0,2 point au troisième trimestre.");
        scored_input.suspicious_domain = true;
        let v = scored(scored_input);
        // 62 - 20
        assert_eq!(v.score, 42.0);
        assert!(v.factors.has_flag(FactorFlag::SuspiciousDomain));
        assert!(v.details.issues_detected.iter().any(|i| i == ISSUE_BLOG_HOST));
    }

    #[test]
    fn penalty_never_goes_below_zero() {
        let mut scored_input = input("URGENT SCANDALE HONTEUX TERRIFIANT CATASTROPHE");
        scored_input.suspicious_domain = true;
        assert_eq!(scored(scored_input).score, 0.0);
    }

    #[test]
    fn explanation_is_deterministic() {
        let factors = extract(SENSATIONAL).factors;
        assert_eq!(explain(40.0, &factors, None), explain(40.0, &factors, None));
    }

    #[test]
    fn explanation_brackets() {
        let calm = FeatureSet {
            source_mention: 0.8,
            ..FeatureSet::default()
        };
        assert!(explain(80.0, &calm, None).starts_with("Cette information semble fiable."));
        assert!(explain(60.0, &calm, None).starts_with("Cette information est douteuse."));
        assert!(!explain(60.0, &calm, None).contains("vérification approfondie"));
        assert!(explain(49.99, &calm, None).contains("vérification approfondie"));
    }
}
