use serde::Deserialize;
use serde_json::Value;

use super::error::ExplanationError;
use crate::constants::MAX_CREDIBILITY_SCORE;

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    factors: Option<Value>,
    #[serde(default)]
    credibility_score: Option<Value>,
}

/// Structured answer requested from the generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationEnvelope {
    pub explanation: String,
    pub factors: Vec<String>,
    /// Service-proposed score, capped at the reportable maximum.
    pub suggested_score: Option<u8>,
}

/// Returns the span from the first `{` to the last `}` inclusive.
pub fn locate_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_score(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() {
        return None;
    }
    Some(number.round().clamp(0.0, f64::from(MAX_CREDIBILITY_SCORE)) as u8)
}

fn factor_text(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s,
        Value::Null => return None,
        other => other.to_string(),
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Extracts and parses the JSON envelope from a completion.
pub fn parse_envelope(completion: &str) -> Result<ExplanationEnvelope, ExplanationError> {
    let span = locate_json_span(completion).ok_or_else(|| ExplanationError::ResponseParse {
        reason: "no JSON object found in completion".to_string(),
    })?;

    let raw: RawEnvelope =
        serde_json::from_str(span).map_err(|e| ExplanationError::ResponseParse {
            reason: format!("invalid JSON envelope: {}", e),
        })?;

    let explanation = raw
        .explanation
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ExplanationError::ResponseParse {
            reason: "envelope has no explanation text".to_string(),
        })?;

    Ok(ExplanationEnvelope {
        explanation,
        factors: match raw.factors {
            Some(Value::Array(items)) => items.into_iter().filter_map(factor_text).collect(),
            Some(single) => factor_text(single).into_iter().collect(),
            None => Vec::new(),
        },
        suggested_score: raw.credibility_score.as_ref().and_then(parse_score),
    })
}
