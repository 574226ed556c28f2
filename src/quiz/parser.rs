//! Quiz response parser.
//!
//! Two stages, so a failure is attributed to the right one:
//!   1. The trimmed text is decoded as JSON. Only if that fails is it treated
//!      as wrapped: `strip_fences` removes a Markdown code fence
//!      (```` ```json ... ``` ````) and any prose around it, and the body is
//!      decoded instead (`MalformedPayload` if that fails too). Fences inside
//!      a payload that already decodes, e.g. code in a question, are left alone.
//!   2. The decoded value is checked against the quiz schema (`SchemaViolation`).
//!
//! Every failure carries the untouched raw text for diagnostics.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{QuizQuestion, OPTIONS_PER_QUESTION, QUIZ_LENGTH};
use crate::errors::ParseError;

const FENCE: &str = "```";
const QUESTIONS_KEY: &str = "questions";

#[derive(Deserialize)]
struct RawQuestion {
  question: String,
  options: Vec<String>,
  answer: String,
}

/// Parse raw model output into exactly `QUIZ_LENGTH` questions.
pub fn parse_quiz_response(raw: &str) -> Result<Vec<QuizQuestion>, ParseError> {
  let value = match serde_json::from_str::<Value>(raw.trim()) {
    Ok(value) => value,
    Err(_) => serde_json::from_str::<Value>(strip_fences(raw)).map_err(|e| ParseError::MalformedPayload {
      reason: e.to_string(),
      raw: raw.to_string(),
    })?,
  };

  let schema = |reason: String| ParseError::SchemaViolation { reason, raw: raw.to_string() };

  let list = match value.get(QUESTIONS_KEY) {
    Some(Value::Array(list)) => list,
    Some(_) => return Err(schema(format!("\"{QUESTIONS_KEY}\" is not a list"))),
    None => return Err(schema(format!("missing top-level \"{QUESTIONS_KEY}\" list"))),
  };
  if list.len() != QUIZ_LENGTH {
    return Err(schema(format!("expected {QUIZ_LENGTH} questions, got {}", list.len())));
  }

  list
    .iter()
    .enumerate()
    .map(|(i, item)| decode_question(item).map_err(|reason| schema(format!("question {}: {reason}", i + 1))))
    .collect()
}

fn decode_question(item: &Value) -> Result<QuizQuestion, String> {
  let q = RawQuestion::deserialize(item).map_err(|e| e.to_string())?;

  if q.question.trim().is_empty() {
    return Err("empty question text".into());
  }
  if q.options.len() != OPTIONS_PER_QUESTION {
    return Err(format!("expected {OPTIONS_PER_QUESTION} options, got {}", q.options.len()));
  }
  for (i, opt) in q.options.iter().enumerate() {
    if q.options[..i].contains(opt) {
      return Err(format!("duplicate option '{opt}'"));
    }
  }
  if !q.options.contains(&q.answer) {
    return Err(format!("answer '{}' is not one of the options", q.answer));
  }

  Ok(QuizQuestion { prompt: q.question, options: q.options, correct_answer: q.answer })
}

/// Returns the body of the first fenced block, or the trimmed input when there
/// is no complete fence. An info string right after the opening fence
/// (e.g. `json`) is dropped.
fn strip_fences(raw: &str) -> &str {
  let trimmed = raw.trim();
  let Some(open) = trimmed.find(FENCE) else {
    return trimmed;
  };
  let after_open = &trimmed[open + FENCE.len()..];
  let tag_len = after_open
    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
    .unwrap_or(after_open.len());
  let body = &after_open[tag_len..];
  match body.rfind(FENCE) {
    Some(close) => body[..close].trim(),
    None => trimmed,
  }
}
