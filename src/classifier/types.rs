use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Binary verdict of the credibility classifier.
pub enum CredibilityLabel {
    Fake,
    Real,
}

impl CredibilityLabel {
    /// Returns `true` for [`CredibilityLabel::Fake`].
    pub fn is_fake(&self) -> bool {
        matches!(self, CredibilityLabel::Fake)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CredibilityLabel::Fake => "fake",
            CredibilityLabel::Real => "real",
        }
    }
}

impl std::fmt::Display for CredibilityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Raw (pre-softmax) classifier outputs.
pub struct Logits {
    pub fake: f32,
    pub real: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Outcome of a single classification call.
pub struct ClassificationResult {
    pub label: CredibilityLabel,
    /// Probability mass of the chosen label, in `[0, 1]`.
    pub confidence: f32,
    pub logits: Logits,
}

impl ClassificationResult {
    /// Builds a result from raw logits.
    ///
    /// `fake` wins only with strictly greater probability; an exact tie is `real`.
    pub fn from_logits(logits: Logits) -> Self {
        let probs = crate::model::utils::softmax(&[logits.fake, logits.real]);
        let (p_fake, p_real) = (probs[0], probs[1]);

        let (label, confidence) = if p_fake > p_real {
            (CredibilityLabel::Fake, p_fake)
        } else {
            (CredibilityLabel::Real, p_real)
        };

        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
            logits,
        }
    }

    pub fn is_fake(&self) -> bool {
        self.label.is_fake()
    }
}
