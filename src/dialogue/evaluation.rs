use serde::Deserialize;

use crate::error::EvaluationParseError;
use crate::session::Evaluation;

#[derive(Debug, Deserialize)]
struct RawEvaluation {
    summary: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    score: i64,
}

/// Remove one optional fenced-code wrapper (```` ```json ```` or bare ```` ``` ````)
fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an info string such as `json` on the opening fence line
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the model's evaluation response.
///
/// The whole response is the payload; the only tolerated decoration is a
/// single fenced-code wrapper.
pub fn parse_evaluation(raw: &str) -> Result<Evaluation, EvaluationParseError> {
    let text = strip_fence(raw.trim());
    if text.is_empty() {
        return Err(EvaluationParseError::Empty);
    }

    let parsed: RawEvaluation = serde_json::from_str(text)?;
    let score = u8::try_from(parsed.score)
        .ok()
        .filter(|s| *s <= 100)
        .ok_or(EvaluationParseError::ScoreOutOfRange(parsed.score))?;

    Ok(Evaluation {
        summary: parsed.summary,
        strengths: parsed.strengths,
        weaknesses: parsed.weaknesses,
        score,
    })
}
