use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    /// No usable signal (index outside the label table, or inference failed).
    Unknown,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Unknown => "unknown",
        }
    }

    /// Parses a label name case-insensitively; unrecognized names are `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" => Some(Sentiment::Positive),
            "negative" | "neg" => Some(Sentiment::Negative),
            "neutral" | "neu" => Some(Sentiment::Neutral),
            "unknown" => Some(Sentiment::Unknown),
            _ => None,
        }
    }

    /// Positive or negative.
    pub fn is_polarized(&self) -> bool {
        matches!(self, Sentiment::Positive | Sentiment::Negative)
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickbaitAnalysis {
    pub is_clickbait: bool,
    /// Matched trigger phrases in vocabulary order, each at most once.
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub person: u32,
    pub organization: u32,
    pub location: u32,
}

impl EntityCounts {
    pub fn new(person: u32, organization: u32, location: u32) -> Self {
        Self {
            person,
            organization,
            location,
        }
    }

    pub fn total(&self) -> u32 {
        self.person + self.organization + self.location
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Auxiliary linguistic signals extracted from one text.
pub struct FeatureSet {
    pub sentiment: Sentiment,
    pub clickbait: ClickbaitAnalysis,
    pub entities: EntityCounts,
    /// Whitespace-delimited token count of the raw text.
    pub word_count: usize,
    /// `false` when the entity recognizer was unavailable and counts are zero-filled.
    pub entities_available: bool,
}

impl FeatureSet {
    pub fn is_clickbait(&self) -> bool {
        self.clickbait.is_clickbait
    }

    pub fn total_entities(&self) -> u32 {
        self.entities.total()
    }
}
