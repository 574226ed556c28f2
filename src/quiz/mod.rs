//! Quiz lifecycle: prompt building, response parsing, grading, and the session
//! state machine that ties them together.

pub mod grading;
pub mod parser;
pub mod prompt;
pub mod session;

pub use grading::{grade, Grade};
pub use parser::parse_quiz_response;
pub use session::{ActiveQuiz, GradedQuiz, QuizSession};
