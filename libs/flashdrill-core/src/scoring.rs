//! Points for answers and rounds.

use crate::history::History;
use crate::round::AnswerRecord;
use crate::types::{Card, Level, Prompt, Seconds, MAX_LEVEL};
use chrono::{DateTime, TimeZone};

/// Awarded when a correct answer beats the card's recorded time.
pub const SPEED_BONUS: u32 = 5;
/// Base points for a vocabulary card.
pub const WORD_BASE_POINTS: u32 = 5;
/// Bonus for the first round of a day or every `BONUS_INTERVAL`th round.
pub const DAILY_BONUS: u32 = 10;
pub const BONUS_INTERVAL: usize = 5;

/// Difficulty proxy of a card: the smaller factor, or a flat value for words.
pub fn base_points(prompt: &Prompt) -> u32 {
    match prompt {
        Prompt::Product { x, y } => u32::from(*x.min(y)),
        Prompt::Word { .. } => WORD_BASE_POINTS,
    }
}

/// Points for one answer.
///
/// `level` and `prior_time` are the card's values before the answer is
/// applied. Wrong answers score nothing and never subtract.
pub fn score_answer(
    card: &Card,
    correct: bool,
    level: Level,
    prior_time: Seconds,
    elapsed: Seconds,
) -> u32 {
    if !correct {
        return 0;
    }
    let level_bonus = u32::from(MAX_LEVEL + 1 - level.get());
    let speed_bonus = if elapsed < prior_time { SPEED_BONUS } else { 0 };
    base_points(&card.prompt) + level_bonus + speed_bonus
}

/// Sum of answer points over a round.
pub fn score_round(answers: &[AnswerRecord]) -> u32 {
    answers.iter().map(|a| a.points).sum()
}

/// Bonus for the round about to be recorded at `now`.
///
/// Granted when no earlier round falls on `now`'s calendar day, or when this
/// round's play count is a multiple of `BONUS_INTERVAL`. Both checks read
/// only the history, so they hold across restarts.
pub fn daily_bonus<Tz: TimeZone>(history: &History, now: &DateTime<Tz>) -> u32 {
    let tz = now.timezone();
    let first_today = history.played_on(now.date_naive(), &tz).next().is_none();
    let milestone = (history.len() + 1) % BONUS_INTERVAL == 0;
    if first_today || milestone {
        DAILY_BONUS
    } else {
        0
    }
}
