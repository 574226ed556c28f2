//! Domain models: quiz questions, per-question verdicts, and the fixed quiz length.

/// Every generated quiz has exactly this many questions.
pub const QUIZ_LENGTH: usize = 10;

/// Choices offered per question.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// One multiple-choice question. `correct_answer` is always one of `options`;
/// the parser refuses to build a question otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizQuestion {
  pub prompt: String,
  pub options: Vec<String>,
  pub correct_answer: String,
}

impl QuizQuestion {
  pub fn offers(&self, choice: &str) -> bool {
    self.options.iter().any(|o| o == choice)
  }
}

/// Grading outcome for a single question, in quiz order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
  pub index: usize,
  pub correct: bool,
  pub chosen: Option<String>,
  pub correct_answer: String,
}
