//! Credibility score synthesis.
//!
//! A pure, additive fusion of the classifier verdict with the auxiliary features:
//!
//! ```text
//! base          = round(p(real) * 90)
//! sentiment     = +5 neutral | -2 positive/negative | 0 unknown
//! clickbait     = -15 if clickbait else +5
//! entities      = round(min(1, total / 10) * 10)
//! score         = clamp(sum, 5, 95)
//! ```
//!
//! `p(real)` is the confidence for a `real` verdict and `1 - confidence` for a
//! `fake` one. Keeping each term separate lets [`ScoreBreakdown`] report exactly
//! how a score was reached. The clamp guarantees the score never claims absolute
//! certainty in either direction.

pub mod synthesizer;
pub mod types;


pub use synthesizer::{entity_diversity, score_breakdown, synthesize};
pub use types::{CredibilityScore, ScoreBreakdown};
