//! End-to-end runs of `Analyzer::analyze` against mocked collaborators.

use std::sync::Arc;
use std::time::Duration;

use veritas_common::{
    AnalysisRequest, FactorFlag, ScrapedPage, SentimentLabel, Verdict, VerdictLabel,
};
use veritas_scoring::classifier::{FAKE_LABEL, RELIABLE_LABEL};
use veritas_scoring::jitter::FixedJitter;
use veritas_scoring::testing::{
    calm_article, page, trusted_record, zero_shot_output, FailingSourceStore, MockClassifier,
    MockFetcher,
};
use veritas_scoring::traits::TrustedSourceStore;
use veritas_scoring::analyzer::MAX_SCORED_CHARS;
use veritas_scoring::{Analyzer, AnalyzerDeps, InMemorySourceStore, Rejection};

const SENSATIONAL: &str = "INCROYABLE ! Un complot mondial révélé, selon une étude choquante.";

fn analyzer_with(fetcher: Arc<MockFetcher>, store: Arc<dyn TrustedSourceStore>) -> Analyzer {
    Analyzer::new(
        AnalyzerDeps::builder()
            .fetcher(fetcher)
            .store(store)
            .jitter(Arc::new(FixedJitter(0.5)))
            .build(),
    )
}

fn analyzer(fetcher: Arc<MockFetcher>) -> Analyzer {
    analyzer_with(fetcher, Arc::new(InMemorySourceStore::default()))
}

fn with_classifier(classifier: Arc<MockClassifier>) -> Analyzer {
    Analyzer::new(
        AnalyzerDeps::builder()
            .fetcher(Arc::new(MockFetcher::new()))
            .store(Arc::new(InMemorySourceStore::default()))
            .classifier(Some(classifier))
            .build(),
    )
}

fn without_timing(mut verdict: Verdict) -> Verdict {
    verdict.analysis_time_ms = 0;
    verdict
}

// ---------------------------------------------------------------------------
// Gatekeeper
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blocked_host_is_not_relevant() {
    let fetcher = Arc::new(MockFetcher::new());
    let v = analyzer(fetcher.clone())
        .analyze(&AnalysisRequest::url("https://github.com/foo/bar"))
        .await;

    assert_eq!(v.verdict, VerdictLabel::NonPertinent);
    assert_eq!(v.score, 0.0);
    assert_eq!(v.confidence_score, 0.0);
    assert_eq!(v.explanation, Rejection::BlockedHost("github.com".into()).to_string());
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn document_extension_is_not_relevant() {
    let fetcher = Arc::new(MockFetcher::new());
    let v = analyzer(fetcher.clone())
        .analyze(&AnalysisRequest::url("https://example.com/doc.pdf"))
        .await;

    assert_eq!(v.verdict, VerdictLabel::NonPertinent);
    assert_eq!(v.score, 0.0);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn short_scraped_page_is_not_relevant() {
    let url = "https://example.com/breve";
    let fetcher = Arc::new(MockFetcher::new().on_page(url, page(url, "", &"x".repeat(50))));
    let v = analyzer(fetcher).analyze(&AnalysisRequest::url(url)).await;

    assert_eq!(v.verdict, VerdictLabel::NonPertinent);
    assert_eq!(v.score, 0.0);
    assert_eq!(v.explanation, Rejection::TooShort { chars: 50 }.to_string());
}

// ---------------------------------------------------------------------------
// Trusted sources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn authoritative_domain_short_circuits() {
    let fetcher = Arc::new(MockFetcher::new());
    let v = analyzer(fetcher.clone())
        .analyze(&AnalysisRequest::url("https://www.un.org/some-article"))
        .await;

    assert_eq!(v.verdict, VerdictLabel::Fiable);
    assert!(v.score >= 95.0 && v.score < 100.0);
    assert!(v.factors.has_flag(FactorFlag::KnownSource));
    assert_eq!(v.confidence_score, 0.95);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn stored_source_wins_regardless_of_content() {
    let url = "https://www.mediapart.fr/journal/france/article";
    // Would score very low if it were fetched.
    let fetcher = Arc::new(MockFetcher::new().on_page(url, page(url, "URGENT", &SENSATIONAL.repeat(5))));
    let store = InMemorySourceStore::new(vec![trusted_record("Mediapart", "https://www.mediapart.fr", 0.88)]);

    let v = analyzer_with(fetcher.clone(), Arc::new(store))
        .analyze(&AnalysisRequest::url(url))
        .await;

    assert_eq!(v.verdict, VerdictLabel::Fiable);
    assert!(v.score >= 95.0);
    assert_eq!(v.confidence_score, 0.88);
    assert_eq!(v.details.source.unwrap().name, "Mediapart");
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn failing_store_still_allows_authoritative_and_scoring() {
    let url = "https://example.com/post";
    let fetcher = Arc::new(MockFetcher::new().on_page(url, page(url, "Chômage en recul", &calm_article())));
    let analyzer = analyzer_with(fetcher, Arc::new(FailingSourceStore));

    let v = analyzer.analyze(&AnalysisRequest::url("https://www.who.int/news")).await;
    assert_eq!(v.verdict, VerdictLabel::Fiable);

    let v = analyzer.analyze(&AnalysisRequest::url(url)).await;
    assert_eq!(v.score, 66.0);
    assert_eq!(v.details.source_reliability, Some(0.5));
}

// ---------------------------------------------------------------------------
// Fetch failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_error_is_a_degraded_verdict() {
    let url = "https://example.com/down";
    let fetcher = Arc::new(MockFetcher::new().on_error(url, "connection refused"));
    let v = analyzer(fetcher).analyze(&AnalysisRequest::url(url)).await;

    assert_eq!(v.verdict, VerdictLabel::Douteux);
    assert_eq!(v.score, 30.0);
    assert!(v.explanation.contains("connection refused"));
    assert!(v.factors.has_flag(FactorFlag::Inaccessible));
}

#[tokio::test]
async fn slow_fetch_times_out() {
    let url = "https://example.com/slow";
    let fetcher = Arc::new(
        MockFetcher::new()
            .on_page(url, page(url, "Titre", &calm_article()))
            .with_delay(Duration::from_millis(500)),
    );
    let analyzer = Analyzer::new(
        AnalyzerDeps::builder()
            .fetcher(fetcher)
            .store(Arc::new(InMemorySourceStore::default()))
            .fetch_timeout(Duration::from_millis(20))
            .build(),
    );

    let v = analyzer.analyze(&AnalysisRequest::url(url)).await;
    assert_eq!(v.verdict, VerdictLabel::Douteux);
    assert_eq!(v.score, 30.0);
    assert!(v.explanation.contains("délai"));
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sensational_text_example() {
    let v = analyzer(Arc::new(MockFetcher::new()))
        .analyze(&AnalysisRequest::text(SENSATIONAL))
        .await;

    assert!(v.factors.sensationalism > 0.0);
    assert!(v.factors.clickbait_indicators > 0.0);
    assert_eq!(v.factors.source_mention, 0.8);
    assert!(v.score < 50.0);
    assert!(matches!(v.verdict, VerdictLabel::Douteux | VerdictLabel::Faux));
    assert!(v.label_matches_score());
}

#[tokio::test]
async fn free_blog_host_loses_points() {
    let blog = "https://monblog.wordpress.com/post";
    let site = "https://example.com/post";
    let fetcher = Arc::new(
        MockFetcher::new()
            .on_page(blog, page(blog, "Chômage en recul", &calm_article()))
            .on_page(site, page(site, "Chômage en recul", &calm_article())),
    );
    let analyzer = analyzer(fetcher);

    let on_site = analyzer.analyze(&AnalysisRequest::url(site)).await;
    let on_blog = analyzer.analyze(&AnalysisRequest::url(blog)).await;

    assert_eq!(on_site.score, 66.0);
    assert_eq!(on_blog.score, 46.0);
    assert!(on_blog.factors.has_flag(FactorFlag::SuspiciousDomain));
    assert!(!on_site.factors.has_flag(FactorFlag::SuspiciousDomain));
}

#[tokio::test]
async fn scored_text_is_title_description_and_head_of_body() {
    let with_description = "https://example.com/budget";
    let bare = "https://example.com/budget-bis";

    let filler = "Le conseil municipal a examiné le budget de la commune pendant la séance du soir.";
    let mut body = vec![filler; 30].join("\n");
    assert!(body.chars().count() > MAX_SCORED_CHARS);
    body.push_str("\nUn scandale choquant a éclaté.");

    let described = ScrapedPage {
        description: "Selon la préfecture, le vote est prévu jeudi.".to_string(),
        ..page(with_description, "Budget communal", &body)
    };
    let fetcher = Arc::new(
        MockFetcher::new()
            .on_page(with_description, described)
            .on_page(bare, page(bare, "Budget communal", &body)),
    );
    let analyzer = analyzer(fetcher);

    let v = analyzer.analyze(&AnalysisRequest::url(with_description)).await;
    // The attribution cue only appears in the description.
    assert_eq!(v.factors.source_mention, 0.8);
    // The sensational sentence sits past the scoring window.
    assert_eq!(v.factors.sensationalism, 0.0);
    assert_eq!(v.factors.emotional_language, 0.0);
    assert!(v.bias_indicators.sensational_words.is_empty());
    let metrics = v.details.text_metrics.as_ref().unwrap();
    assert!(metrics.word_count < body.split_whitespace().count());

    let v = analyzer.analyze(&AnalysisRequest::url(bare)).await;
    assert_eq!(v.factors.source_mention, 0.0);
    assert_eq!(v.factors.sensationalism, 0.0);
}

#[tokio::test]
async fn blend_stays_between_heuristic_and_classifier() {
    let heuristic: f64 = 35.5;
    for p in [0.0, 0.3, 0.7, 1.0] {
        let mock = Arc::new(
            MockClassifier::new(zero_shot_output(&[(RELIABLE_LABEL, p), (FAKE_LABEL, 0.0)]))
                .with_sentiment(&[("negative", 0.9), ("neutral", 0.1)]),
        );
        let v = with_classifier(mock).analyze(&AnalysisRequest::text(SENSATIONAL)).await;

        let ml = p * 100.0;
        let (lo, hi) = (heuristic.min(ml), heuristic.max(ml));
        assert!(v.score >= lo - 0.01 && v.score <= hi + 0.01, "p={p} score={}", v.score);
        assert!((v.score - (heuristic + ml) / 2.0).abs() < 0.01);
        assert!(v.label_matches_score());

        let classifier = v.classifier.unwrap();
        assert_eq!(classifier.sentiment_label, SentimentLabel::Negative);
    }
}

#[tokio::test]
async fn failing_classifier_degrades_to_heuristics() {
    let mock = Arc::new(MockClassifier::failing());
    let v = with_classifier(mock.clone()).analyze(&AnalysisRequest::text(SENSATIONAL)).await;

    assert_eq!(mock.zero_shot_calls(), 1);
    assert!(v.classifier.is_none());
    assert_eq!(v.score, 35.5);
    assert_eq!(v.confidence_score, 0.5);
}

#[tokio::test]
async fn empty_zero_shot_reply_degrades_to_heuristics() {
    let mock = Arc::new(MockClassifier::new(zero_shot_output(&[])));
    let v = with_classifier(mock.clone()).analyze(&AnalysisRequest::text(SENSATIONAL)).await;

    assert_eq!(mock.zero_shot_calls(), 1);
    assert!(v.classifier.is_none());
    assert_eq!(v.score, 35.5);
    assert_eq!(v.verdict, VerdictLabel::Douteux);
    assert_eq!(v.confidence_score, 0.5);
}

#[tokio::test]
async fn heuristic_run_is_idempotent() {
    let analyzer = analyzer(Arc::new(MockFetcher::new()));
    let request = AnalysisRequest::text(SENSATIONAL);

    let first = without_timing(analyzer.analyze(&request).await);
    let second = without_timing(analyzer.analyze(&request).await);
    assert_eq!(first, second);
}

#[tokio::test]
async fn score_and_label_agree() {
    let analyzer = analyzer(Arc::new(MockFetcher::new()));
    let texts = [
        SENSATIONAL,
        "Le conseil municipal se réunit mardi pour voter le budget annuel.",
        "Selon l'AFP, une étude de l'INSERM rapporte une baisse des cas.",
        "URGENT SCANDALE HONTEUX TERRIFIANT CATASTROPHE",
    ];
    for text in texts {
        let v = analyzer.analyze(&AnalysisRequest::text(text)).await;
        assert!((0.0..=100.0).contains(&v.score));
        assert!(v.label_matches_score(), "{text}: {} / {}", v.score, v.verdict);
    }
}

// ---------------------------------------------------------------------------
// Media and cross-check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn media_requests_are_stubbed() {
    let fetcher = Arc::new(MockFetcher::new());
    let analyzer = analyzer(fetcher.clone());

    for request in [
        AnalysisRequest::Image { url: "https://example.com/a.png".into() },
        AnalysisRequest::Video { url: "https://example.com/a.mp4".into() },
    ] {
        let v = analyzer.analyze(&request).await;
        assert_eq!(v.score, 50.0);
        assert_eq!(v.verdict, VerdictLabel::Douteux);
        assert!(v.factors.has_flag(FactorFlag::ImageAnalysis));
    }
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn cross_check_lists_verified_sources() {
    let store = InMemorySourceStore::new(vec![
        trusted_record("Le Monde", "https://www.lemonde.fr", 0.9),
        trusted_record("Libération", "https://www.liberation.fr", 0.85),
    ]);
    let analyzer = analyzer_with(Arc::new(MockFetcher::new()), Arc::new(store));

    let matches = analyzer.cross_check("le vaccin provoque l'autisme").await;
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.search_url.starts_with("https://www.google.com/search?q=")));
    assert!(matches.windows(2).all(|w| w[0].relevance >= w[1].relevance));
}
