//! Error taxonomy for quiz sessions and the model gateway.
//!
//! Every variant maps to a stable `kind()` code that the protocol layer sends to
//! the frontend. None of these are fatal to the process.

use thiserror::Error;

/// Failure of a model gateway call. The attempt is abandoned; no retry here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
  #[error("model gateway not configured (set OPENAI_API_KEY)")]
  NotConfigured,

  #[error("request failed: {0}")]
  Transport(String),

  #[error("model HTTP {status}: {message}")]
  Http { status: u16, message: String },

  #[error("could not decode model response: {0}")]
  Decode(String),

  #[error("model returned an empty response")]
  EmptyResponse,
}

/// Failure to turn raw model text into quiz questions.
/// Both variants keep the raw text unchanged for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  #[error("malformed quiz payload: {reason}")]
  MalformedPayload { reason: String, raw: String },

  #[error("quiz payload violates schema: {reason}")]
  SchemaViolation { reason: String, raw: String },
}

impl ParseError {
  pub fn raw(&self) -> &str {
    match self {
      ParseError::MalformedPayload { raw, .. } | ParseError::SchemaViolation { raw, .. } => raw,
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      ParseError::MalformedPayload { .. } => "malformed_payload",
      ParseError::SchemaViolation { .. } => "schema_violation",
    }
  }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("model gateway error: {0}")]
  Gateway(#[from] GatewayError),

  #[error(transparent)]
  Parse(#[from] ParseError),

  /// A caller defect: wrong phase for the transition, or an answer that the UI
  /// could never have offered.
  #[error("precondition violated: {0}")]
  PreconditionViolation(String),
}

impl QuizError {
  pub fn kind(&self) -> &'static str {
    match self {
      QuizError::InvalidInput(_) => "invalid_input",
      QuizError::Gateway(_) => "gateway_error",
      QuizError::Parse(e) => e.kind(),
      QuizError::PreconditionViolation(_) => "precondition_violation",
    }
  }

  /// Offending model output, when the failure came from parsing it.
  pub fn raw(&self) -> Option<&str> {
    match self {
      QuizError::Parse(e) => Some(e.raw()),
      _ => None,
    }
  }
}
