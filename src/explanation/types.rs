use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Where an explanation came from.
pub enum Provenance {
    /// Produced by the external generation service.
    Generated,
    /// Synthesized locally from fixed templates.
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Generated => "generated",
            Provenance::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Raw completion returned by a generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<TokenUsage>,
    /// Model identifier reported by the service.
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Human-readable rationale for a credibility assessment.
pub struct Explanation {
    pub text: String,
    pub provenance: Provenance,
    /// Token usage; only present on the generated path.
    pub usage: Option<TokenUsage>,
    /// Contributing factors listed by the service, empty on the fallback path.
    pub factors: Vec<String>,
    /// Score proposed by the service (capped at 95). Informational only.
    pub suggested_score: Option<u8>,
    /// Generation model, only present on the generated path.
    pub model: Option<String>,
}

impl Explanation {
    pub fn fallback(text: String) -> Self {
        Self {
            text,
            provenance: Provenance::Fallback,
            usage: None,
            factors: Vec::new(),
            suggested_score: None,
            model: None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self.provenance, Provenance::Generated)
    }
}
