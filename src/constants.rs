//! Cross-cutting, shared constants.
//!
//! The score bounds are a product invariant: the pipeline never reports absolute
//! certainty in either direction. Everything else here is a tunable default.

/// Lowest credibility score the pipeline will ever report.
pub const MIN_CREDIBILITY_SCORE: u8 = 5;

/// Highest credibility score the pipeline will ever report.
pub const MAX_CREDIBILITY_SCORE: u8 = 95;

/// Scale applied to classifier confidence to form the base score.
pub const BASE_SCORE_SCALE: f64 = 90.0;

/// Entity count at which entity diversity saturates at 1.0.
pub const ENTITY_DIVERSITY_SATURATION: f64 = 10.0;

/// Maximum points contributed by entity diversity.
pub const ENTITY_ADJUSTMENT_SCALE: f64 = 10.0;

/// Highest confidence percentage ever shown to the generation service.
pub const MAX_DISPLAYED_CONFIDENCE_PCT: u8 = 99;

/// Texts with fewer whitespace tokens than this are considered "short".
pub const DEFAULT_SHORT_TEXT_WORDS: usize = 30;

/// Maximum tokenizer sequence length for the BERT-family models.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Input length bounds expected from callers (characters).
pub const MIN_INPUT_CHARS: usize = 10;
pub const MAX_INPUT_CHARS: usize = 5000;
