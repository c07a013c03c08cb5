//! # Quiz
//!
//! $$
//! \text{score} = \sum_{q=1}^{10} \mathbf 1\{a_q \approx a_q^\*\}
//! $$
//!
//! Closing quiz: ten questions, grading and the two exported files.
use std::fmt::Display;

use serde::Deserialize;
use tracing::info;

use crate::error::LabError;
use crate::error::Result;

pub mod certificate;
pub mod workbook;

pub use certificate::Certificate;
pub use workbook::write_workbook;

/// Number of questions in the quiz.
pub const QUESTION_COUNT: usize = 10;

/// Correct answer for one question.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Expected {
  Choice(&'static str),
  /// Numeric answer accepted when strictly within `tolerance`.
  Number { value: f64, tolerance: f64 },
}

#[derive(Clone, Copy, Debug)]
pub struct Question {
  pub prompt: &'static str,
  /// Options for multiple-choice questions, empty for numeric ones.
  pub choices: &'static [&'static str],
  pub expected: Expected,
}

pub const QUESTIONS: [Question; QUESTION_COUNT] = [
  Question {
    prompt: "Market falls, who gains?",
    choices: &["Long", "Short"],
    expected: Expected::Choice("Short"),
  },
  Question {
    prompt: "Basis at expiry becomes?",
    choices: &["Zero", "Large"],
    expected: Expected::Choice("Zero"),
  },
  Question {
    prompt: "Spot=100, r=10%. Futures?",
    choices: &[],
    expected: Expected::Number {
      value: 110.0,
      tolerance: 1.0,
    },
  },
  Question {
    prompt: "Buy 200 -> 210, size 50. P&L?",
    choices: &[],
    expected: Expected::Number {
      value: 500.0,
      tolerance: 1.0,
    },
  },
  Question {
    prompt: "Hedge contracts for 10L?",
    choices: &[],
    expected: Expected::Number {
      value: 1.0,
      tolerance: 0.5,
    },
  },
  Question {
    prompt: "MTM reduces?",
    choices: &["Credit risk", "Return"],
    expected: Expected::Choice("Credit risk"),
  },
  Question {
    prompt: "Futures > spot?",
    choices: &["Contango", "Backwardation"],
    expected: Expected::Choice("Contango"),
  },
  Question {
    prompt: "Best hedge correlation?",
    choices: &["High", "Low"],
    expected: Expected::Choice("High"),
  },
  Question {
    prompt: "Rolling means?",
    choices: &["Close & reopen", "Hold"],
    expected: Expected::Choice("Close & reopen"),
  },
  Question {
    prompt: "Short 500 -> 520 size 10 loss?",
    choices: &[],
    expected: Expected::Number {
      value: 200.0,
      tolerance: 1.0,
    },
  },
];

/// A student's answer as typed or selected.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Answer {
  Number(f64),
  Choice(String),
}

impl Display for Answer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Answer::Number(v) => write!(f, "{v}"),
      Answer::Choice(s) => write!(f, "{s}"),
    }
  }
}

impl Expected {
  /// Choices compare case-insensitively; numbers within tolerance.
  pub fn accepts(&self, answer: &Answer) -> bool {
    match (self, answer) {
      (Expected::Choice(want), Answer::Choice(got)) => got.trim().eq_ignore_ascii_case(want),
      (Expected::Number { value, tolerance }, Answer::Number(got)) => (got - value).abs() < *tolerance,
      (Expected::Number { value, tolerance }, Answer::Choice(got)) => got
        .trim()
        .parse::<f64>()
        .map(|got| (got - value).abs() < *tolerance)
        .unwrap_or(false),
      (Expected::Choice(_), Answer::Number(_)) => false,
    }
  }
}

/// The answers file read by the CLI.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QuizSubmission {
  #[serde(default)]
  pub student: Student,
  pub answers: Vec<Answer>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Student {
  pub name: String,
  pub id: String,
}

impl Student {
  pub fn new(name: &str, id: &str) -> Self {
    Self {
      name: name.into(),
      id: id.into(),
    }
  }

  /// Both name and id filled in.
  pub fn is_identified(&self) -> bool {
    !self.name.trim().is_empty() && !self.id.trim().is_empty()
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizResult {
  pub score: u32,
  pub total: u32,
  /// Per-question correctness, in question order.
  pub correct: Vec<bool>,
}

impl QuizResult {
  pub fn passed(&self, pass_mark: u32) -> bool {
    self.score >= pass_mark
  }
}

/// Grade a full set of answers against [`QUESTIONS`].
pub fn grade(answers: &[Answer]) -> Result<QuizResult> {
  if answers.len() != QUESTION_COUNT {
    return Err(LabError::invalid(
      "answers",
      format!("expected {QUESTION_COUNT} answers, got {}", answers.len()),
    ));
  }
  let correct: Vec<bool> = QUESTIONS
    .iter()
    .zip(answers)
    .map(|(q, a)| q.expected.accepts(a))
    .collect();
  let score = correct.iter().filter(|c| **c).count() as u32;
  info!(score, total = QUESTION_COUNT, "quiz graded");
  Ok(QuizResult {
    score,
    total: QUESTION_COUNT as u32,
    correct,
  })
}

impl QuizSubmission {
  pub fn from_toml_str(s: &str) -> Result<Self> {
    toml::from_str(s).map_err(|e| LabError::Config(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn perfect() -> Vec<Answer> {
    vec![
      Answer::Choice("Short".into()),
      Answer::Choice("Zero".into()),
      Answer::Number(110.0),
      Answer::Number(500.0),
      Answer::Number(1.0),
      Answer::Choice("Credit risk".into()),
      Answer::Choice("Contango".into()),
      Answer::Choice("High".into()),
      Answer::Choice("Close & reopen".into()),
      Answer::Number(200.0),
    ]
  }

  #[test]
  fn perfect_score() {
    let result = grade(&perfect()).unwrap();
    assert_eq!(result.score, 10);
    assert!(result.passed(5));
  }

  #[test]
  fn tolerance_is_strict() {
    let mut answers = perfect();
    answers[2] = Answer::Number(110.9);
    answers[4] = Answer::Number(1.5);
    answers[9] = Answer::Number(199.0);
    let result = grade(&answers).unwrap();
    assert!(result.correct[2]);
    assert!(!result.correct[4]);
    assert!(!result.correct[9]);
    assert_eq!(result.score, 8);
  }

  #[test]
  fn choices_ignore_case_and_whitespace() {
    let mut answers = perfect();
    answers[0] = Answer::Choice("  short ".into());
    answers[1] = Answer::Choice("Large".into());
    answers[3] = Answer::Choice("500".into());
    let result = grade(&answers).unwrap();
    assert!(result.correct[0]);
    assert!(!result.correct[1]);
    assert!(result.correct[3]);
  }

  #[test]
  fn wrong_answer_count_is_rejected() {
    assert!(grade(&perfect()[..9]).is_err());
  }

  #[test]
  fn submission_from_toml() {
    let submission = QuizSubmission::from_toml_str(
      r#"
        answers = ["Short", "Zero", 110, 500, 1, "Credit risk", "Contango", "High", "Close & reopen", 200.0]

        [student]
        name = "Asha"
        id = "FL-042"
      "#,
    )
    .unwrap();
    assert!(submission.student.is_identified());
    assert_eq!(submission.answers[2], Answer::Number(110.0));
    assert_eq!(grade(&submission.answers).unwrap().score, 10);
  }

  #[test]
  fn anonymous_student() {
    assert!(!Student::new("", "FL-1").is_identified());
    assert!(!Student::new("Asha", "  ").is_identified());
  }
}
