//! Statistics derived from the store and the history.

use crate::history::History;
use crate::types::{Card, Level, MAX_LEVEL};
use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// Snapshot of card progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardStats {
    pub total: usize,
    /// Card counts for levels 1 through 5.
    pub by_level: [usize; MAX_LEVEL as usize],
    pub mastered: usize,
    /// Mean recorded typed time, 0.0 when there are no cards.
    pub average_time: f64,
}

impl CardStats {
    pub fn mastered_share(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mastered as f64 / self.total as f64
        }
    }
}

/// Snapshot of past rounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub rounds: usize,
    pub rounds_today: usize,
    pub total_points: u64,
    pub best_round: Option<u32>,
    /// Correct answers over attempted answers across all rounds.
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub cards: CardStats,
    pub history: HistoryStats,
}

pub fn card_stats<'a, I>(cards: I) -> CardStats
where
    I: IntoIterator<Item = &'a Card>,
{
    let mut by_level = [0; MAX_LEVEL as usize];
    let mut total = 0;
    let mut time_sum = 0.0;
    for card in cards {
        total += 1;
        by_level[usize::from(card.level.get() - 1)] += 1;
        time_sum += card.time.get();
    }
    CardStats {
        total,
        by_level,
        mastered: by_level[usize::from(Level::HIGHEST.get() - 1)],
        average_time: if total == 0 { 0.0 } else { time_sum / total as f64 },
    }
}

pub fn history_stats<Tz: TimeZone>(history: &History, now: &DateTime<Tz>) -> HistoryStats {
    let (correct, attempted) = history
        .iter()
        .fold((0, 0), |(c, a), r| (c + r.correct, a + r.attempted));
    HistoryStats {
        rounds: history.len(),
        rounds_today: history.played_on(now.date_naive(), &now.timezone()).count(),
        total_points: history.iter().map(|r| u64::from(r.total())).sum(),
        best_round: history.iter().map(|r| r.total()).max(),
        accuracy: if attempted == 0 {
            0.0
        } else {
            correct as f64 / attempted as f64
        },
    }
}
