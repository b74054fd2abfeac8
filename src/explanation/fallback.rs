//! Template explanation used whenever the generated path is unavailable.
//!
//! Output depends only on the verdict and the feature set, so identical inputs
//! always produce byte-identical text.

use crate::classifier::CredibilityLabel;
use crate::features::{FeatureSet, Sentiment};

use super::config::FallbackConfig;

fn sentiment_tone(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "إيجابية",
        Sentiment::Negative => "سلبية",
        Sentiment::Neutral => "محايدة",
        Sentiment::Unknown => "غير محددة",
    }
}

fn fake_sentences(features: &FeatureSet, is_short: bool) -> Vec<String> {
    let mut parts = vec![
        "تشير التحليلات الآلية للنمط اللغوي إلى احتمالية أن يكون الخبر غير دقيق".to_string(),
    ];

    match features.sentiment {
        Sentiment::Negative => parts.push(
            "يتضمن النص لغة سلبية وعاطفية قد تهدف إلى إثارة المشاعر".to_string(),
        ),
        Sentiment::Positive => parts.push(
            "يستخدم النص لغة إيجابية مبالغ فيها قد تهدف إلى التأثير على القارئ".to_string(),
        ),
        Sentiment::Neutral | Sentiment::Unknown => {}
    }

    if features.is_clickbait() {
        parts.push(
            "يحتوي العنوان على أسلوب الطعم الإعلامي (Clickbait) المصمم لجذب النقرات".to_string(),
        );
    }

    let entities = &features.entities;
    if entities.is_empty() {
        parts.push(
            "يفتقر النص إلى ذكر أسماء أشخاص أو مؤسسات أو أماكن محددة، مما يضعف مصداقيته"
                .to_string(),
        );
    } else if entities.person > 0 && entities.organization == 0 {
        parts.push(format!(
            "يذكر النص {} شخص/أشخاص دون الإشارة إلى مصادر أو مؤسسات رسمية",
            entities.person
        ));
    }

    if is_short {
        parts.push("قصر النص قد يشير إلى نقص في التفاصيل والمعلومات الموثقة".to_string());
    }

    parts
}

fn real_sentences(features: &FeatureSet) -> Vec<String> {
    let mut parts = vec!["تشير التحليلات الآلية إلى أن الخبر صيغ بلغة متوازنة".to_string()];

    match features.sentiment {
        Sentiment::Neutral => parts.push(
            "يتميز النص بلغة موضوعية ومحايدة تتناسب مع الأخبار الموثوقة".to_string(),
        ),
        Sentiment::Positive | Sentiment::Negative => parts.push(format!(
            "رغم النبرة {}، يحافظ النص على درجة من التوازن",
            sentiment_tone(features.sentiment)
        )),
        Sentiment::Unknown => {}
    }

    let entities = &features.entities;
    if !entities.is_empty() {
        let mut details = Vec::new();
        if entities.person > 0 {
            details.push(format!("{} شخص", entities.person));
        }
        if entities.organization > 0 {
            details.push(format!("{} مؤسسة", entities.organization));
        }
        if entities.location > 0 {
            details.push(format!("{} موقع", entities.location));
        }
        parts.push(format!(
            "يتضمن النص إشارات واضحة إلى كيانات محددة ({})",
            details.join(", ")
        ));
    }

    if !features.is_clickbait() {
        parts.push("يخلو النص من مؤشرات الإثارة والعناوين المضللة".to_string());
    }

    parts
}

/// Builds the deterministic template explanation for a verdict and feature set.
pub fn fallback_explanation(
    label: CredibilityLabel,
    features: &FeatureSet,
    config: &FallbackConfig,
) -> String {
    // Only the fake branch comments on length.
    let parts = match label {
        CredibilityLabel::Fake => {
            fake_sentences(features, features.word_count < config.short_text_words)
        }
        CredibilityLabel::Real => real_sentences(features),
    };

    format!("{}.", parts.join(". "))
}
