//! Grading: a pure function of questions and answers.
//!
//! Produces structured verdicts only; human-readable lines are rendered by the
//! protocol layer.

use crate::domain::{QuizQuestion, Verdict};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grade {
  pub score: usize,
  pub total: usize,
  pub review: Vec<Verdict>,
}

/// One verdict per question, in order. An unset answer never matches.
/// `answers` shorter than `questions` counts the missing tail as unset.
pub fn grade(questions: &[QuizQuestion], answers: &[Option<String>]) -> Grade {
  let review: Vec<Verdict> = questions
    .iter()
    .enumerate()
    .map(|(index, q)| {
      let chosen = answers.get(index).cloned().flatten();
      let correct = chosen.as_deref() == Some(q.correct_answer.as_str());
      Verdict { index, correct, chosen, correct_answer: q.correct_answer.clone() }
    })
    .collect();

  let score = review.iter().filter(|v| v.correct).count();
  Grade { score, total: questions.len(), review }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::quiz::testing::questions;

  #[test]
  fn score_counts_exact_matches() {
    let qs = questions(10);
    let mut answers = vec![None; 10];
    answers[0] = Some("A0".to_string());
    answers[1] = Some("B1".to_string());
    answers[5] = Some("A5".to_string());
    answers[9] = Some("A9".to_string());

    let g = grade(&qs, &answers);
    assert_eq!(g.score, 3);
    assert_eq!(g.total, 10);
    let correct: Vec<usize> = g.review.iter().filter(|v| v.correct).map(|v| v.index).collect();
    assert_eq!(correct, vec![0, 5, 9]);
  }

  #[test]
  fn every_question_gets_a_verdict_even_when_nothing_is_answered() {
    let g = grade(&questions(10), &vec![None; 10]);
    assert_eq!(g.score, 0);
    assert_eq!(g.review.len(), 10);
    for (i, v) in g.review.iter().enumerate() {
      assert_eq!(v.index, i);
      assert!(!v.correct);
      assert_eq!(v.chosen, None);
      assert_eq!(v.correct_answer, format!("A{i}"));
    }
  }

  #[test]
  fn wrong_choice_is_recorded_in_the_verdict() {
    let mut answers = vec![None; 10];
    answers[2] = Some("C2".to_string());
    let g = grade(&questions(10), &answers);
    assert_eq!(
      g.review[2],
      Verdict { index: 2, correct: false, chosen: Some("C2".into()), correct_answer: "A2".into() }
    );
  }

  #[test]
  fn all_correct_scores_full_marks() {
    let answers: Vec<Option<String>> = (0..10).map(|i| Some(format!("A{i}"))).collect();
    let g = grade(&questions(10), &answers);
    assert_eq!((g.score, g.total), (10, 10));
  }

  #[test]
  fn short_answer_list_counts_as_unset() {
    let g = grade(&questions(10), &[Some("A0".to_string())]);
    assert_eq!(g.score, 1);
    assert_eq!(g.review.len(), 10);
  }
}
