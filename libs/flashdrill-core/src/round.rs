//! State of the round in progress.

use crate::types::{CardId, GameConfig, Seconds};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One answered card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub card_id: CardId,
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<usize>,
    pub elapsed: Seconds,
    pub points: u32,
    #[serde(default)]
    pub timed_out: bool,
}

/// Cards drawn for a round and the answers given so far.
///
/// Holds card ids only; the cards themselves stay in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: Uuid,
    pub config: GameConfig,
    pub started_at: DateTime<Utc>,
    pub cards: Vec<CardId>,
    pub answers: Vec<AnswerRecord>,
}

impl Round {
    pub fn new(config: GameConfig, cards: Vec<CardId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            started_at: Utc::now(),
            cards,
            answers: Vec::new(),
        }
    }

    /// The card awaiting an answer, if any.
    pub fn current(&self) -> Option<&CardId> {
        self.cards.get(self.answers.len())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= self.cards.len()
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    /// Drop unanswered cards that `keep` rejects. Answered cards stay so the
    /// record of the round remains intact.
    pub fn retain_pending<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&CardId) -> bool,
    {
        let answered = self.answers.len();
        let before = self.cards.len();
        let pending: Vec<CardId> = self.cards.split_off(answered.min(before));
        self.cards.extend(pending.into_iter().filter(|id| keep(id)));
        before - self.cards.len()
    }
}
