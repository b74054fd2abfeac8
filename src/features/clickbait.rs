use super::types::ClickbaitAnalysis;

/// Arabic sensationalist trigger phrases, in match-report order.
pub const DEFAULT_CLICKBAIT_PHRASES: &[&str] = &[
    "شاهد قبل الحذف",
    "لن تصدق",
    "بسرعة",
    "فضيحة",
    "لا يفوتك",
    "مفاجأة",
    "حصرياً",
    "عاجل",
    "الصدمة",
    "كيف حصل هذا",
    "خطير",
];

/// Substring matcher over a fixed, ordered phrase vocabulary.
///
/// Matching runs against the raw text: no case folding, no Unicode
/// normalization, no diacritic stripping.
#[derive(Debug, Clone)]
pub struct ClickbaitDetector {
    phrases: Vec<String>,
}

impl Default for ClickbaitDetector {
    fn default() -> Self {
        Self::with_phrases(DEFAULT_CLICKBAIT_PHRASES.iter().copied())
    }
}

impl ClickbaitDetector {
    /// Builds a detector from a vocabulary. Empty and repeated phrases are dropped.
    pub fn with_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for phrase in phrases.into_iter().map(Into::into) {
            if !phrase.is_empty() && !unique.contains(&phrase) {
                unique.push(phrase);
            }
        }
        Self { phrases: unique }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn detect(&self, text: &str) -> ClickbaitAnalysis {
        let keywords: Vec<String> = self
            .phrases
            .iter()
            .filter(|phrase| text.contains(phrase.as_str()))
            .cloned()
            .collect();

        ClickbaitAnalysis {
            is_clickbait: !keywords.is_empty(),
            keywords,
        }
    }
}
