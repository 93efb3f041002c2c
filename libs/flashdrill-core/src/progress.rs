//! Per-card progress updates after an answer.
//!
//! This is the only place a card's level and recorded times change.

use crate::types::{AnswerMode, Card, Seconds};

/// Return the card as it stands after one answer.
///
/// A correct answer climbs one level and records `elapsed` as the new time
/// for `mode`. A wrong answer drops one level and keeps the old time, so a
/// fast wrong answer is never rewarded.
pub fn apply(card: &Card, correct: bool, elapsed: Seconds, mode: AnswerMode) -> Card {
    let mut next = card.clone();
    if correct {
        next.level = card.level.raised();
        next.set_time_for(mode, elapsed);
    } else {
        next.level = card.level.lowered();
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Level, Prompt, WordEntry, MAX_SECONDS, MIN_SECONDS};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn correct_answer_raises_level_and_records_time() {
        let card = Card::new(Prompt::product(7, 8));
        let next = apply(&card, true, Seconds::new(4.2), AnswerMode::Typed);
        assert_eq!(next.level.get(), 2);
        assert_eq!(next.time, Seconds::new(4.2));
    }

    #[test]
    fn wrong_answer_lowers_level_and_keeps_time() {
        let mut card = Card::new(Prompt::product(7, 8));
        card.level = Level::new(3);
        card.time = Seconds::new(9.0);
        let next = apply(&card, false, Seconds::new(1.0), AnswerMode::Typed);
        assert_eq!(next.level.get(), 2);
        assert_eq!(next.time, Seconds::new(9.0));

        let floor = apply(&Card::new(Prompt::product(3, 3)), false, Seconds::new(1.0), AnswerMode::Typed);
        assert_eq!(floor.level, Level::LOWEST);
    }

    #[test]
    fn level_caps_at_mastered() {
        let mut card = Card::new(Prompt::product(7, 8));
        card.level = Level::HIGHEST;
        let next = apply(&card, true, Seconds::new(2.0), AnswerMode::Typed);
        assert_eq!(next.level, Level::HIGHEST);
    }

    #[test]
    fn flip_mode_records_blind_time_only() {
        let card = Card::new(Prompt::word(WordEntry {
            en: "dog".into(),
            de: "Hund".into(),
            unit: "animals".into(),
        }));
        let next = apply(&card, true, Seconds::new(3.0), AnswerMode::Flip);
        assert_eq!(next.blind_time, Some(Seconds::new(3.0)));
        assert_eq!(next.time, Seconds::SLOWEST);
    }

    #[test]
    fn applying_twice_moves_twice() {
        let card = Card::new(Prompt::product(6, 4));
        let once = apply(&card, true, Seconds::new(5.0), AnswerMode::Typed);
        let twice = apply(&once, true, Seconds::new(5.0), AnswerMode::Typed);
        assert_eq!(once.level.get(), 2);
        assert_eq!(twice.level.get(), 3);
    }

    #[test]
    fn random_sequences_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut card = Card::new(Prompt::product(9, 9));
        for _ in 0..1_000 {
            let correct = rng.random_bool(0.5);
            let elapsed = Seconds::new(rng.random_range(-10.0..120.0));
            card = apply(&card, correct, elapsed, AnswerMode::Typed);
            assert!((1..=5).contains(&card.level.get()));
            assert!((MIN_SECONDS..=MAX_SECONDS).contains(&card.time.get()));
        }
    }
}
