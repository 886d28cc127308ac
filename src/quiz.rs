//! Running quiz attempt for one topic within a session.

use std::collections::HashSet;

use crate::domain::QuizQuestion;

#[derive(Clone, Debug, PartialEq)]
pub struct QuizAttempt {
  pub topic_id: String,
  pub points: i64,
  answered: HashSet<String>,
}

impl QuizAttempt {
  pub fn new(topic_id: &str) -> Self {
    Self { topic_id: topic_id.to_string(), points: 0, answered: HashSet::new() }
  }

  /// Grade one answer. Points are awarded at most once per question.
  pub fn answer(&mut self, question: &QuizQuestion, option: usize, points_per_correct: i64) -> bool {
    let correct = option == question.correct_answer;
    if self.answered.insert(question.id.clone()) && correct {
      self.points += points_per_correct;
    }
    correct
  }

  pub fn answered_count(&self) -> usize {
    self.answered.len()
  }
}

pub fn verdict(percentage: u32) -> &'static str {
  if percentage >= 80 {
    "Outstanding!"
  } else if percentage >= 60 {
    "Great job!"
  } else {
    "Keep practicing!"
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn q(id: &str, correct: usize) -> QuizQuestion {
    QuizQuestion {
      id: id.into(),
      question: "?".into(),
      options: vec!["a".into(), "b".into(), "c".into()],
      correct_answer: correct,
    }
  }

  #[test]
  fn points_only_for_first_answer_to_a_question() {
    let mut attempt = QuizAttempt::new("topic-1");
    assert!(!attempt.answer(&q("q-1", 1), 0, 10));
    assert!(attempt.answer(&q("q-1", 1), 1, 10));
    assert_eq!(attempt.points, 0);
    assert!(attempt.answer(&q("q-2", 2), 2, 10));
    assert!(attempt.answer(&q("q-2", 2), 2, 10));
    assert_eq!(attempt.points, 10);
    assert_eq!(attempt.answered_count(), 2);
  }

  #[test]
  fn verdict_thresholds() {
    assert_eq!(verdict(100), "Outstanding!");
    assert_eq!(verdict(80), "Outstanding!");
    assert_eq!(verdict(60), "Great job!");
    assert_eq!(verdict(59), "Keep practicing!");
  }
}
