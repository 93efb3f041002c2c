//! Append-only log of finished rounds.

use crate::types::GameConfig;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate of one finished round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub id: Uuid,
    pub played_at: DateTime<Utc>,
    pub config: GameConfig,
    /// Points earned by answers.
    pub points: u32,
    /// Daily bonus granted when the round was recorded.
    pub bonus: u32,
    pub correct: usize,
    pub attempted: usize,
}

impl GameResult {
    pub fn total(&self) -> u32 {
        self.points + self.bonus
    }

    /// Share of attempted cards answered correctly, 0.0 for an empty round.
    pub fn accuracy(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempted as f64
        }
    }
}

/// Past results in the order they were played. Entries are never changed
/// or removed once appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<GameResult>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, result: GameResult) {
        self.0.push(result);
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameResult> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[GameResult] {
        &self.0
    }

    /// Rounds whose local calendar day in `tz` is `day`.
    pub fn played_on<'a, Tz: TimeZone>(
        &'a self,
        day: NaiveDate,
        tz: &'a Tz,
    ) -> impl Iterator<Item = &'a GameResult> + 'a {
        self.0
            .iter()
            .filter(move |r| r.played_at.with_timezone(tz).date_naive() == day)
    }
}

impl FromIterator<GameResult> for History {
    fn from_iter<I: IntoIterator<Item = GameResult>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
