//! Quiz session state machine.
//!
//! ```text
//!   Empty ──start_generation──▶ Active ──submit──▶ Graded ──reset──▶ Empty
//!     │            ▲
//!     └─(failure)──▶ AwaitingTopic
//! ```
//!
//! A session is owned by exactly one interactive client and is only changed
//! through the transition methods below. Any failure of `start_generation`
//! leaves the session in `AwaitingTopic` so the user can retry. Calling a
//! transition from the wrong phase is a caller defect and is reported as
//! `PreconditionViolation` (logged at error level), never silently ignored.

use tracing::{error, info, instrument, warn};

use crate::config::Prompts;
use crate::domain::{QuizQuestion, Verdict};
use crate::errors::{GatewayError, QuizError};
use crate::gateway::ModelGateway;
use crate::quiz::grading::grade;
use crate::quiz::parser::parse_quiz_response;
use crate::quiz::prompt::build_generation_prompt;
use crate::util::trunc_for_log;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum QuizSession {
  #[default]
  Empty,
  AwaitingTopic,
  Active(ActiveQuiz),
  Graded(GradedQuiz),
}

/// Invariant: `answers.len() == questions.len()` and every set answer is one
/// of the matching question's options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveQuiz {
  topic: String,
  questions: Vec<QuizQuestion>,
  answers: Vec<Option<String>>,
}

impl ActiveQuiz {
  pub fn topic(&self) -> &str { &self.topic }
  pub fn questions(&self) -> &[QuizQuestion] { &self.questions }
  pub fn answers(&self) -> &[Option<String>] { &self.answers }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradedQuiz {
  topic: String,
  score: usize,
  total: usize,
  review: Vec<Verdict>,
}

impl GradedQuiz {
  pub fn topic(&self) -> &str { &self.topic }
  pub fn score(&self) -> usize { self.score }
  pub fn total(&self) -> usize { self.total }
  pub fn review(&self) -> &[Verdict] { &self.review }
}

impl QuizSession {
  pub fn phase(&self) -> &'static str {
    match self {
      QuizSession::Empty => "empty",
      QuizSession::AwaitingTopic => "awaiting_topic",
      QuizSession::Active(_) => "active",
      QuizSession::Graded(_) => "graded",
    }
  }

  pub fn active(&self) -> Option<&ActiveQuiz> {
    match self {
      QuizSession::Active(q) => Some(q),
      _ => None,
    }
  }

  pub fn graded(&self) -> Option<&GradedQuiz> {
    match self {
      QuizSession::Graded(g) => Some(g),
      _ => None,
    }
  }

  /// Ask the gateway for a quiz on `topic` and, if the reply parses, become `Active`
  /// with every answer unset. Only valid from `Empty` or `AwaitingTopic`.
  #[instrument(level = "info", skip(self, gateway, prompts), fields(phase = self.phase()))]
  pub async fn start_generation(
    &mut self,
    topic: &str,
    gateway: &dyn ModelGateway,
    prompts: &Prompts,
  ) -> Result<(), QuizError> {
    let topic = self.prepare_generation(topic)?;
    let prompt = build_generation_prompt(prompts, &topic);
    let outcome = gateway.generate(&prompt).await;
    self.finish_generation(topic, outcome)
  }

  fn prepare_generation(&mut self, topic: &str) -> Result<String, QuizError> {
    if !matches!(self, QuizSession::Empty | QuizSession::AwaitingTopic) {
      return Err(self.wrong_phase("start_generation"));
    }
    *self = QuizSession::AwaitingTopic;

    let topic = topic.trim();
    if topic.is_empty() {
      warn!(target: "quiz", "Rejected blank topic");
      return Err(QuizError::InvalidInput("topic must not be empty".into()));
    }
    Ok(topic.to_string())
  }

  fn finish_generation(&mut self, topic: String, outcome: Result<String, GatewayError>) -> Result<(), QuizError> {
    let raw = outcome.map_err(|e| {
      warn!(target: "quiz", %topic, error = %e, "Quiz generation failed at the gateway");
      e
    })?;

    let questions = parse_quiz_response(&raw).map_err(|e| {
      warn!(target: "quiz", %topic, kind = e.kind(), error = %e, raw_preview = %trunc_for_log(&raw, 200), "Quiz generation returned an unusable payload");
      e
    })?;

    info!(target: "quiz", %topic, questions = questions.len(), "Quiz generated");
    let answers = vec![None; questions.len()];
    *self = QuizSession::Active(ActiveQuiz { topic, questions, answers });
    Ok(())
  }

  /// Set (or overwrite) the answer to question `index`.
  pub fn record_answer(&mut self, index: usize, choice: &str) -> Result<(), QuizError> {
    let QuizSession::Active(quiz) = self else {
      return Err(self.wrong_phase("record_answer"));
    };

    let Some(question) = quiz.questions.get(index) else {
      let len = quiz.questions.len();
      error!(target: "quiz", index, len, "Answer index out of range");
      return Err(QuizError::PreconditionViolation(format!(
        "answer index {index} out of range (quiz has {len} questions)"
      )));
    };
    if !question.offers(choice) {
      error!(target: "quiz", index, %choice, "Answer is not one of the offered options");
      return Err(QuizError::PreconditionViolation(format!(
        "'{choice}' is not an option of question {}",
        index + 1
      )));
    }

    quiz.answers[index] = Some(choice.to_string());
    Ok(())
  }

  /// Grade the active quiz and become `Graded`. Unset answers count as incorrect.
  pub fn submit(&mut self) -> Result<(), QuizError> {
    let QuizSession::Active(quiz) = self else {
      return Err(self.wrong_phase("submit"));
    };

    let g = grade(&quiz.questions, &quiz.answers);
    let answered = quiz.answers.iter().filter(|a| a.is_some()).count();
    info!(target: "quiz", topic = %quiz.topic, score = g.score, total = g.total, answered, "Quiz submitted");

    let topic = std::mem::take(&mut quiz.topic);
    *self = QuizSession::Graded(GradedQuiz { topic, score: g.score, total: g.total, review: g.review });
    Ok(())
  }

  /// Discard all quiz data. Normally called from `Graded`, but always succeeds.
  pub fn reset(&mut self) {
    if !matches!(self, QuizSession::Graded(_)) {
      warn!(target: "quiz", phase = self.phase(), "Reset outside of the graded phase");
    }
    *self = QuizSession::Empty;
  }

  fn wrong_phase(&self, op: &str) -> QuizError {
    let phase = self.phase();
    error!(target: "quiz", op, phase, "Transition attempted from the wrong phase");
    QuizError::PreconditionViolation(format!("{op} is not allowed while the session is {phase}"))
  }
}
