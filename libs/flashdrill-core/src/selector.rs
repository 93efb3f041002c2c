//! Weighted card selection for a round.
//!
//! Cards that survive the selection filter get a weight from the focus
//! strategy, then up to `limit` cards are drawn without replacement. Each
//! draw picks proportionally to the weights still in play.

use crate::types::{AnswerMode, Card, Focus, Selection};
use rand::Rng;

/// Selection weight of a card under `focus`.
pub fn weight(card: &Card, focus: Focus, mode: AnswerMode) -> f64 {
    match focus {
        Focus::Weak => 1.0 / f64::from(card.level.get()),
        Focus::Strong => f64::from(card.level.get()),
        Focus::Slow => card.time_for(mode).get(),
    }
}

/// Cards accepted by `selection`, in pool order.
pub fn filter<'a, I>(pool: I, selection: &Selection) -> Vec<&'a Card>
where
    I: IntoIterator<Item = &'a Card>,
{
    pool.into_iter().filter(|card| selection.accepts(card)).collect()
}

/// Draw up to `limit` cards for a round.
///
/// Returns fewer cards when fewer survive the filter, and an empty list
/// when none do.
pub fn select<'a, I, R>(
    pool: I,
    selection: &Selection,
    focus: Focus,
    mode: AnswerMode,
    limit: usize,
    rng: &mut R,
) -> Vec<&'a Card>
where
    I: IntoIterator<Item = &'a Card>,
    R: Rng,
{
    let weighted = filter(pool, selection)
        .into_iter()
        .map(|card| (card, weight(card, focus, mode)))
        .collect();
    let drawn = weighted_sample(weighted, limit, rng);
    tracing::debug!(drawn = drawn.len(), ?focus, "selected cards");
    drawn
}

/// Weighted sampling without replacement.
///
/// Negative and non-finite weights count as zero. A zero-weight item is only
/// drawn once every remaining item has zero weight, and then uniformly.
pub fn weighted_sample<T, R: Rng>(items: Vec<(T, f64)>, limit: usize, rng: &mut R) -> Vec<T> {
    let mut remaining: Vec<(T, f64)> = items
        .into_iter()
        .map(|(item, w)| (item, if w.is_finite() && w > 0.0 { w } else { 0.0 }))
        .collect();
    let mut drawn = Vec::with_capacity(limit.min(remaining.len()));

    while drawn.len() < limit && !remaining.is_empty() {
        let total: f64 = remaining.iter().map(|(_, w)| w).sum();

        let index = if total > 0.0 {
            let mut target = rng.random_range(0.0..total);
            remaining
                .iter()
                .position(|(_, w)| {
                    if target < *w {
                        true
                    } else {
                        target -= w;
                        false
                    }
                })
                // Rounding can leave target just past the last bucket
                .or_else(|| remaining.iter().rposition(|(_, w)| *w > 0.0))
                .unwrap_or(0)
        } else {
            rng.random_range(0..remaining.len())
        };

        drawn.push(remaining.swap_remove(index).0);
    }

    drawn
}
