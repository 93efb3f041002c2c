//! Answer evaluation for numeric and typed text answers.

use crate::types::{Card, Prompt, Response};
use serde::{Deserialize, Serialize};

/// Largest edit distance a text answer may have and still count as correct.
pub const TYPO_THRESHOLD: usize = 2;

/// Outcome of checking a response against a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Whether the answer is considered correct.
    pub correct: bool,
    /// Edit distance to the expected text, for text answers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
}

impl Evaluation {
    fn incorrect() -> Self {
        Self {
            correct: false,
            distance: None,
        }
    }

    /// Correct, but only thanks to typo tolerance.
    pub fn near_miss(&self) -> bool {
        self.correct && self.distance.is_some_and(|d| d > 0)
    }
}

/// Evaluate a response with the default typo threshold.
pub fn evaluate(card: &Card, response: &Response) -> Evaluation {
    evaluate_with(card, response, TYPO_THRESHOLD)
}

/// Evaluate a response against the card's expected answer.
pub fn evaluate_with(card: &Card, response: &Response, threshold: usize) -> Evaluation {
    match response {
        Response::Timeout => Evaluation::incorrect(),
        Response::SelfGraded { recalled } => Evaluation {
            correct: *recalled,
            distance: None,
        },
        Response::Typed { text } => match &card.prompt {
            Prompt::Product { x, y } => compare_number(text, u32::from(*x) * u32::from(*y)),
            Prompt::Word { de, .. } => compare_text(text, de, threshold),
        },
    }
}

/// Exact integer comparison. Anything that does not parse is wrong.
pub fn compare_number(typed: &str, expected: u32) -> Evaluation {
    match typed.trim().parse::<u32>() {
        Ok(value) => Evaluation {
            correct: value == expected,
            distance: None,
        },
        Err(_) => Evaluation::incorrect(),
    }
}

/// Typo-tolerant text comparison.
pub fn compare_text(typed: &str, expected: &str, threshold: usize) -> Evaluation {
    if typed == expected {
        return Evaluation {
            correct: true,
            distance: Some(0),
        };
    }

    let distance = levenshtein_distance(&normalize(typed), &normalize(expected));
    Evaluation {
        correct: distance <= threshold,
        distance: Some(distance),
    }
}

/// Trim, collapse inner whitespace and fold case.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Number of single-character inserts, deletes and substitutions that turn
/// `a` into `b`. Counts chars, not bytes.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // A shared prefix or suffix never costs anything.
    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count();
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    // row[j] is the distance between the consumed part of `long` and short[..j].
    let mut row: Vec<usize> = (0..=short.len()).collect();
    for (i, lc) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let above = row[j + 1];
            let replace = diagonal + usize::from(lc != sc);
            row[j + 1] = replace.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }
    row[short.len()]
}
