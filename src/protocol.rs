//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! The session view never includes the correct answers of an active quiz;
//! they are revealed only in the graded review.

use serde::{Deserialize, Serialize};

use crate::domain::Verdict;
use crate::errors::QuizError;
use crate::quiz::QuizSession;

/// Messages the client can send over WebSocket. Each connection owns one session.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    GetSession,
    StartQuiz {
        topic: String,
    },
    RecordAnswer {
        index: usize,
        choice: String,
    },
    SubmitQuiz,
    ResetQuiz,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session {
        session: SessionOut,
    },
    Error {
        #[serde(flatten)]
        error: ErrorOut,
    },
}

/// DTO used by both WS and HTTP for the current session view.
#[derive(Debug, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionOut {
    Empty,
    AwaitingTopic,
    Active {
        topic: String,
        questions: Vec<QuestionOut>,
        answers: Vec<Option<String>>,
    },
    Graded {
        topic: String,
        score: usize,
        total: usize,
        banner: String,
        review: Vec<ReviewOut>,
    },
}

#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOut {
    pub index: usize,
    pub correct: bool,
    pub chosen: Option<String>,
    pub correct_answer: String,
    pub line: String,
}

/// Convert the internal session to the public DTO.
pub fn to_out(session: &QuizSession) -> SessionOut {
    match session {
        QuizSession::Empty => SessionOut::Empty,
        QuizSession::AwaitingTopic => SessionOut::AwaitingTopic,
        QuizSession::Active(quiz) => SessionOut::Active {
            topic: quiz.topic().to_string(),
            questions: quiz
                .questions()
                .iter()
                .enumerate()
                .map(|(index, q)| QuestionOut {
                    index,
                    prompt: q.prompt.clone(),
                    options: q.options.clone(),
                })
                .collect(),
            answers: quiz.answers().to_vec(),
        },
        QuizSession::Graded(g) => SessionOut::Graded {
            topic: g.topic().to_string(),
            score: g.score(),
            total: g.total(),
            banner: score_banner(g.score(), g.total()),
            review: g
                .review()
                .iter()
                .map(|v| ReviewOut {
                    index: v.index,
                    correct: v.correct,
                    chosen: v.chosen.clone(),
                    correct_answer: v.correct_answer.clone(),
                    line: render_verdict(v),
                })
                .collect(),
        },
    }
}

pub fn score_banner(score: usize, total: usize) -> String {
    format!("Your final score: {score}/{total}")
}

/// Human-readable review line; question numbers are 1-based.
pub fn render_verdict(v: &Verdict) -> String {
    let n = v.index + 1;
    match (&v.chosen, v.correct) {
        (_, true) => format!("Question {n}: Correct! The answer was {}.", v.correct_answer),
        (Some(chosen), false) => format!(
            "Question {n}: Incorrect. You chose '{chosen}'. The correct answer was '{}'.",
            v.correct_answer
        ),
        (None, false) => format!(
            "Question {n}: Incorrect. You did not answer. The correct answer was '{}'.",
            v.correct_answer
        ),
    }
}

/// Error body shared by HTTP and WS. `raw` carries the model output for parse failures.
#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl From<&QuizError> for ErrorOut {
    fn from(e: &QuizError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
            raw: e.raw().map(str::to_string),
        }
    }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionOut {
    pub session_id: String,
    pub session: SessionOut,
}

#[derive(Debug, Deserialize)]
pub struct GenerateIn {
    pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    pub index: usize,
    pub choice: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
