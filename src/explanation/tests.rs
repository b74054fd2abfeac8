use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::classifier::{ClassificationResult, CredibilityLabel, Logits};
use crate::features::{ClickbaitAnalysis, EntityCounts, FeatureSet, Sentiment};

fn classification(label: CredibilityLabel, confidence: f32) -> ClassificationResult {
    ClassificationResult {
        label,
        confidence,
        logits: Logits {
            fake: 1.2,
            real: -0.4,
        },
    }
}

fn features(sentiment: Sentiment, is_clickbait: bool, entities: EntityCounts) -> FeatureSet {
    FeatureSet {
        sentiment,
        clickbait: ClickbaitAnalysis {
            is_clickbait,
            keywords: if is_clickbait {
                vec!["عاجل".to_string()]
            } else {
                vec![]
            },
        },
        entities,
        word_count: 40,
        entities_available: true,
    }
}

const GOOD_COMPLETION: &str = r#"إليك التحليل:
```json
{
  "explanation": "يغلب على الخبر طابع الإثارة.",
  "factors": ["لغة عاطفية", "غياب المصادر"],
  "credibility_score": 20
}
```"#;

fn generator_with(service: Arc<MockGenerationService>) -> ExplanationGenerator {
    ExplanationGenerator::new(Some(service), FallbackConfig::default())
}

mod envelope_tests {
    use super::*;

    #[test]
    fn test_locate_json_span_first_open_last_close() {
        assert_eq!(locate_json_span("x {\"a\": {\"b\": 1}} y"), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(locate_json_span("no braces"), None);
        assert_eq!(locate_json_span("} reversed {"), None);
    }

    #[test]
    fn test_parse_envelope_with_surrounding_prose() {
        let envelope = parse_envelope(GOOD_COMPLETION).unwrap();
        assert_eq!(envelope.explanation, "يغلب على الخبر طابع الإثارة.");
        assert_eq!(envelope.factors, vec!["لغة عاطفية", "غياب المصادر"]);
        assert_eq!(envelope.suggested_score, Some(20));
    }

    #[test]
    fn test_parse_envelope_caps_suggested_score() {
        let envelope =
            parse_envelope(r#"{"explanation": "نص", "credibility_score": 100}"#).unwrap();
        assert_eq!(envelope.suggested_score, Some(95));

        let envelope =
            parse_envelope(r#"{"explanation": "نص", "credibility_score": "80%"}"#).unwrap();
        assert_eq!(envelope.suggested_score, Some(80));

        let envelope =
            parse_envelope(r#"{"explanation": "نص", "credibility_score": "high"}"#).unwrap();
        assert_eq!(envelope.suggested_score, None);
    }

    #[test]
    fn test_parse_envelope_single_factor() {
        let envelope = parse_envelope(r#"{"explanation": "نص", "factors": "عامل"}"#).unwrap();
        assert_eq!(envelope.factors, vec!["عامل"]);
        assert!(envelope.suggested_score.is_none());
    }

    #[test]
    fn test_parse_envelope_rejects_missing_json() {
        let err = parse_envelope("plain prose with no structure").unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_parse_envelope_rejects_broken_json() {
        let err = parse_envelope(r#"{"explanation": "نص", "factors": [}"#).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_parse_envelope_rejects_empty_explanation() {
        let err = parse_envelope(r#"{"explanation": "   ", "factors": []}"#).unwrap_err();
        assert!(err.is_parse_error());

        let err = parse_envelope(r#"{"factors": ["a"]}"#).unwrap_err();
        assert!(err.is_parse_error());
    }
}

mod prompt_tests {
    use super::*;

    #[test]
    fn test_displayed_confidence_capped_at_99() {
        assert_eq!(displayed_confidence_pct(1.0), 99);
        assert_eq!(displayed_confidence_pct(0.996), 99);
        assert_eq!(displayed_confidence_pct(0.874), 87);
        assert_eq!(displayed_confidence_pct(0.0), 0);
    }

    #[test]
    fn test_prompt_embeds_signals_and_text() {
        let text = "عاجل: خبر عن الوزارة";
        let prompt = build_explanation_prompt(
            text,
            &classification(CredibilityLabel::Fake, 0.82),
            &features(Sentiment::Negative, true, EntityCounts::new(1, 2, 0)),
        );

        assert!(prompt.contains(text));
        assert!(prompt.contains("مزيف (Fake)"));
        assert!(prompt.contains("82%"));
        assert!(prompt.contains("negative"));
        assert!(prompt.contains("(Clickbait): نعم"));
        assert!(prompt.contains("الكيانات المذكورة: 3"));
        assert!(prompt.contains("\"credibility_score\""));
    }

    #[test]
    fn test_prompt_real_without_clickbait() {
        let prompt = build_explanation_prompt(
            "نص",
            &classification(CredibilityLabel::Real, 0.7),
            &features(Sentiment::Neutral, false, EntityCounts::default()),
        );

        assert!(prompt.contains("حقيقي (Real)"));
        assert!(prompt.contains("(Clickbait): لا"));
    }
}

mod fallback_tests {
    use super::*;

    #[test]
    fn test_fallback_is_deterministic() {
        let f = features(Sentiment::Negative, true, EntityCounts::new(2, 0, 1));
        let config = FallbackConfig::default();

        let a = fallback_explanation(CredibilityLabel::Fake, &f, &config);
        let b = fallback_explanation(CredibilityLabel::Fake, &f, &config);
        assert_eq!(a, b);
        assert!(a.ends_with('.'));
        assert!(!a.ends_with(".."));
    }

    #[test]
    fn test_fake_and_real_branches_differ() {
        let f = features(Sentiment::Neutral, false, EntityCounts::new(1, 1, 1));
        let config = FallbackConfig::default();

        assert_ne!(
            fallback_explanation(CredibilityLabel::Fake, &f, &config),
            fallback_explanation(CredibilityLabel::Real, &f, &config)
        );
    }

    #[test]
    fn test_fake_branch_mentions_clickbait_and_missing_entities() {
        let f = features(Sentiment::Negative, true, EntityCounts::default());
        let text = fallback_explanation(CredibilityLabel::Fake, &f, &FallbackConfig::default());

        assert!(text.contains("Clickbait"));
        assert!(text.contains("يفتقر النص"));
        assert!(text.contains("لغة سلبية"));
        assert_eq!(text.matches(". ").count(), 3);
    }

    #[test]
    fn test_fake_branch_person_without_organization() {
        let f = features(Sentiment::Neutral, false, EntityCounts::new(3, 0, 2));
        let text = fallback_explanation(CredibilityLabel::Fake, &f, &FallbackConfig::default());

        assert!(text.contains("يذكر النص 3 شخص"));
    }

    #[test]
    fn test_real_branch_lists_entity_categories() {
        let f = features(Sentiment::Positive, false, EntityCounts::new(2, 1, 0));
        let text = fallback_explanation(CredibilityLabel::Real, &f, &FallbackConfig::default());

        assert!(text.contains("(2 شخص, 1 مؤسسة)"));
        assert!(text.contains("إيجابية"));
        assert!(text.contains("يخلو النص"));
    }

    #[test]
    fn test_short_text_sentence_uses_threshold() {
        let mut f = features(Sentiment::Neutral, false, EntityCounts::new(1, 1, 0));
        f.word_count = 10;
        let config = FallbackConfig {
            short_text_words: 30,
        };

        let short = fallback_explanation(CredibilityLabel::Fake, &f, &config);
        assert!(short.contains("قصر النص"));

        f.word_count = 30;
        let long = fallback_explanation(CredibilityLabel::Fake, &f, &config);
        assert!(!long.contains("قصر النص"));
    }

    #[test]
    fn test_real_branch_exact_text() {
        let mut f = features(Sentiment::Negative, false, EntityCounts::new(1, 0, 2));
        f.word_count = 4;
        let text = fallback_explanation(CredibilityLabel::Real, &f, &FallbackConfig::default());

        assert_eq!(
            text,
            "تشير التحليلات الآلية إلى أن الخبر صيغ بلغة متوازنة. \
             رغم النبرة سلبية، يحافظ النص على درجة من التوازن. \
             يتضمن النص إشارات واضحة إلى كيانات محددة (1 شخص, 2 موقع). \
             يخلو النص من مؤشرات الإثارة والعناوين المضللة."
        );
    }

    #[test]
    fn test_real_branch_with_clickbait_adds_nothing() {
        let f = features(Sentiment::Unknown, true, EntityCounts::default());
        let text = fallback_explanation(CredibilityLabel::Real, &f, &FallbackConfig::default());

        assert_eq!(text, "تشير التحليلات الآلية إلى أن الخبر صيغ بلغة متوازنة.");
    }
}

#[tokio::test]
async fn test_explain_generated_path() {
    let service = Arc::new(MockGenerationService::replying(GOOD_COMPLETION));
    let generator = generator_with(service.clone());

    let explanation = generator
        .explain(
            "نص الخبر",
            &classification(CredibilityLabel::Fake, 0.9),
            &features(Sentiment::Negative, true, EntityCounts::default()),
        )
        .await;

    assert!(explanation.is_generated());
    assert_eq!(explanation.text, "يغلب على الخبر طابع الإثارة.");
    assert_eq!(
        explanation.usage,
        Some(TokenUsage {
            prompt_tokens: 120,
            completion_tokens: 48
        })
    );
    assert_eq!(explanation.factors.len(), 2);
    assert_eq!(explanation.suggested_score, Some(20));
    assert_eq!(explanation.model.as_deref(), Some("mock-model"));
    assert_eq!(service.call_count(), 1);
    assert!(service.prompts()[0].contains("نص الخبر"));
}

#[tokio::test]
async fn test_explain_without_service_uses_fallback() {
    let generator = ExplanationGenerator::fallback_only(FallbackConfig::default());
    let c = classification(CredibilityLabel::Real, 0.7);
    let f = features(Sentiment::Neutral, false, EntityCounts::new(1, 0, 0));

    let explanation = generator.explain("نص", &c, &f).await;

    assert_eq!(explanation.provenance, Provenance::Fallback);
    assert!(explanation.usage.is_none());
    assert!(explanation.model.is_none());
    assert_eq!(
        explanation.text,
        fallback_explanation(CredibilityLabel::Real, &f, &FallbackConfig::default())
    );
}

#[tokio::test]
async fn test_attempt_without_service_is_not_configured() {
    let generator = ExplanationGenerator::fallback_only(FallbackConfig::default());
    let err = generator
        .attempt(
            "نص",
            &classification(CredibilityLabel::Real, 0.7),
            &features(Sentiment::Neutral, false, EntityCounts::default()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ExplanationError::NotConfigured));
    assert!(err.is_service_error());
}

#[tokio::test]
async fn test_malformed_responses_fall_back() {
    let c = classification(CredibilityLabel::Fake, 0.8);
    let f = features(Sentiment::Positive, false, EntityCounts::default());
    let expected = fallback_explanation(CredibilityLabel::Fake, &f, &FallbackConfig::default());

    for reply in [
        "no json here",
        "{not valid json}",
        r#"{"explanation": ""}"#,
        r#"{"factors": ["a"], "credibility_score": 40}"#,
    ] {
        let service = Arc::new(MockGenerationService::replying(reply));
        let explanation = generator_with(service.clone()).explain("نص", &c, &f).await;

        assert_eq!(explanation.provenance, Provenance::Fallback, "reply: {reply}");
        assert_eq!(explanation.text, expected);
        assert!(explanation.usage.is_none());
        assert_eq!(service.call_count(), 1);
    }
}

#[tokio::test]
async fn test_service_failures_fall_back_after_one_attempt() {
    let c = classification(CredibilityLabel::Real, 0.65);
    let f = features(Sentiment::Neutral, true, EntityCounts::new(0, 1, 1));

    for service in [
        MockGenerationService::timing_out(),
        MockGenerationService::failing("status 500"),
    ] {
        let service = Arc::new(service);
        let explanation = generator_with(service.clone()).explain("نص", &c, &f).await;

        assert_eq!(explanation.provenance, Provenance::Fallback);
        assert!(explanation.usage.is_none());
        assert_eq!(service.call_count(), 1);
    }
}

#[tokio::test]
async fn test_generated_without_usage_reports_none() {
    let service = Arc::new(MockGenerationService::replying(GOOD_COMPLETION).with_usage(None));
    let explanation = generator_with(service)
        .explain(
            "نص",
            &classification(CredibilityLabel::Real, 0.7),
            &features(Sentiment::Neutral, false, EntityCounts::default()),
        )
        .await;

    assert!(explanation.is_generated());
    assert!(explanation.usage.is_none());
}

#[test]
fn test_completion_from_body() {
    let body = r#"{
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "{\"explanation\": \"نص\"}"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }"#;

    let completion = completion_from_body(body, "requested-model").unwrap();
    assert_eq!(completion.model, "test-model");
    assert_eq!(completion.text, "{\"explanation\": \"نص\"}");
    assert_eq!(
        completion.usage,
        Some(TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5
        })
    );
}

#[test]
fn test_completion_from_body_without_choices() {
    let body = r#"{
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "test-model",
        "choices": []
    }"#;

    let err = completion_from_body(body, "requested-model").unwrap_err();
    assert!(err.is_parse_error());
}

#[test]
fn test_completion_from_body_not_json() {
    assert!(
        completion_from_body("<html>bad gateway</html>", "requested-model")
            .unwrap_err()
            .is_parse_error()
    );
}

#[test]
fn test_completion_from_minimal_body() {
    let body = r#"{"choices":[{"message":{"content":"{\"explanation\": \"نص\"}"}}]}"#;

    let completion = completion_from_body(body, "requested-model").unwrap();
    assert_eq!(completion.text, "{\"explanation\": \"نص\"}");
    assert_eq!(completion.model, "requested-model");
    assert!(completion.usage.is_none());
}

#[test]
fn test_completion_from_body_lenient_usage_and_finish_reason() {
    let body = r#"{
        "model": "provider/model-v2",
        "choices": [{
            "message": {"content": "مرحبا"},
            "finish_reason": "eos_token"
        }],
        "usage": {"prompt_tokens": 42, "completion_tokens": 7}
    }"#;

    let completion = completion_from_body(body, "requested-model").unwrap();
    assert_eq!(completion.model, "provider/model-v2");
    assert_eq!(
        completion.usage,
        Some(TokenUsage {
            prompt_tokens: 42,
            completion_tokens: 7
        })
    );
}

#[test]
fn test_completion_from_body_null_content() {
    let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;

    let err = completion_from_body(body, "requested-model").unwrap_err();
    assert!(err.is_parse_error());
}

#[test]
fn test_client_requires_api_key() {
    let err = OpenAiCompatibleClient::new(GenerationConfig::default()).unwrap_err();
    assert!(matches!(err, ExplanationError::NotConfigured));

    let err =
        OpenAiCompatibleClient::new(GenerationConfig::default().with_api_key("  ")).unwrap_err();
    assert!(matches!(err, ExplanationError::NotConfigured));
}

#[test]
fn test_from_config_without_key_is_fallback_only() {
    let generator =
        ExplanationGenerator::from_config(&GenerationConfig::default(), FallbackConfig::default());
    assert!(!generator.has_service());

    let generator = ExplanationGenerator::from_config(
        &GenerationConfig::default().with_api_key("sk-test"),
        FallbackConfig::default(),
    );
    assert!(generator.has_service());
}

#[test]
fn test_generation_config() {
    let config = GenerationConfig::default()
        .with_api_base("http://localhost:9000/v1/")
        .with_timeout(Duration::from_secs(5))
        .with_api_key("sk-secret");

    assert_eq!(
        config.chat_completions_url(),
        "http://localhost:9000/v1/chat/completions"
    );
    assert!(config.validate().is_ok());
    assert!(!format!("{:?}", config).contains("sk-secret"));

    let zero = GenerationConfig::default().with_timeout(Duration::ZERO);
    assert!(zero.validate().is_err());
}

#[test]
fn test_stage_names() {
    assert_eq!(GenerationStage::BuildingPrompt.to_string(), "building_prompt");
    assert_eq!(GenerationStage::Fallback.as_str(), "fallback");
}
