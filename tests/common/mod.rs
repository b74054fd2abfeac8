#![allow(dead_code)]

use std::sync::Arc;

use credence::{
    ClassificationResult, ClickbaitAnalysis, CredibilityLabel, EntityCounts, FeatureSet, Logits,
    MockSequenceModel, Sentiment,
};

pub const CLICKBAIT_TEXT: &str = "عاجل: لن تصدق ما حدث اليوم في المدينة بعد قرار مفاجئ";

pub const NEUTRAL_TEXT: &str =
    "أعلنت وزارة الصحة اليوم عن افتتاح مستشفى جديد في مدينة عمان بحضور الوزير وعدد من المسؤولين";

/// Logits [fake, real] with p(fake) of roughly 0.88.
pub fn fake_leaning_model() -> Arc<MockSequenceModel> {
    Arc::new(MockSequenceModel::with_logits(vec![1.0, -1.0]))
}

/// Logits [fake, real] with p(real) of roughly 0.95.
pub fn real_leaning_model() -> Arc<MockSequenceModel> {
    Arc::new(MockSequenceModel::with_logits(vec![-1.5, 1.5]))
}

/// Sentiment head output whose argmax is index 2 (neutral in the default map).
pub fn neutral_sentiment_model() -> Arc<MockSequenceModel> {
    Arc::new(MockSequenceModel::with_logits(vec![0.1, 0.2, 3.0]))
}

pub fn classification(label: CredibilityLabel, confidence: f32) -> ClassificationResult {
    ClassificationResult {
        label,
        confidence,
        logits: Logits {
            fake: 0.5,
            real: -0.5,
        },
    }
}

pub fn features(sentiment: Sentiment, is_clickbait: bool, entities: EntityCounts) -> FeatureSet {
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
        word_count: 35,
        entities_available: true,
    }
}

/// Chat-completions response body carrying `content`.
pub fn chat_completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-credence-test",
        "object": "chat.completion",
        "created": 1_700_000_000u32,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 321,
            "completion_tokens": 87,
            "total_tokens": 408
        }
    })
}

pub fn envelope(explanation: &str, score: u32) -> String {
    serde_json::json!({
        "explanation": explanation,
        "factors": ["لغة متوازنة", "مصادر رسمية"],
        "credibility_score": score
    })
    .to_string()
}
