use serde::{Deserialize, Serialize};

use crate::constants::{MAX_CREDIBILITY_SCORE, MIN_CREDIBILITY_SCORE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
/// Credibility score, always within `[MIN_CREDIBILITY_SCORE, MAX_CREDIBILITY_SCORE]`.
pub struct CredibilityScore(u8);

impl CredibilityScore {
    /// Clamps a raw additive score into the reportable range.
    pub fn clamped(raw: i32) -> Self {
        let bounded = raw.clamp(MIN_CREDIBILITY_SCORE as i32, MAX_CREDIBILITY_SCORE as i32);
        Self(bounded as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<CredibilityScore> for u8 {
    fn from(score: CredibilityScore) -> Self {
        score.0
    }
}

impl TryFrom<u8> for CredibilityScore {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_CREDIBILITY_SCORE..=MAX_CREDIBILITY_SCORE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "credibility score {} outside [{}, {}]",
                value, MIN_CREDIBILITY_SCORE, MAX_CREDIBILITY_SCORE
            ))
        }
    }
}

impl std::fmt::Display for CredibilityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Each additive term of a synthesized score, before clamping.
pub struct ScoreBreakdown {
    pub base: i32,
    pub sentiment_adjustment: i32,
    pub clickbait_adjustment: i32,
    pub entity_adjustment: i32,
}

impl ScoreBreakdown {
    pub fn raw(&self) -> i32 {
        self.base + self.sentiment_adjustment + self.clickbait_adjustment + self.entity_adjustment
    }

    /// `true` when the clamp changed the raw sum.
    pub fn was_clamped(&self) -> bool {
        CredibilityScore::clamped(self.raw()).value() as i32 != self.raw()
    }
}
