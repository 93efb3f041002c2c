//! Optional extensions of the multiplication card set.
//!
//! Each feature is a row of configuration data: which operand ranges it
//! adds and which features it needs. Activation pulls in prerequisites;
//! deactivation takes dependents down with it.

use crate::error::EngineError;
use crate::store::CardStore;
use crate::types::{Card, CardId, Prompt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Source name of the base multiplication set.
pub const BASE_SOURCE: &str = "base";
/// Never used as an operand in any set.
pub const SKIPPED_FACTOR: u8 = 10;

/// A block of operand pairs.
#[derive(Debug, Clone)]
pub struct PairBlock {
    pub x: RangeInclusive<u8>,
    pub y: RangeInclusive<u8>,
    /// Only keep pairs with `y <= x`.
    pub lower_triangle: bool,
}

impl PairBlock {
    fn prompts(&self) -> impl Iterator<Item = Prompt> + '_ {
        self.x.clone().flat_map(move |x| {
            self.y
                .clone()
                .filter(move |&y| !self.lower_triangle || y <= x)
                .filter(move |&y| x != SKIPPED_FACTOR && y != SKIPPED_FACTOR)
                .map(move |y| Prompt::product(x, y))
        })
    }
}

/// Rule table entry for one feature.
#[derive(Debug, Clone)]
pub struct FeatureRule {
    pub requires: &'static [Feature],
    pub blocks: &'static [PairBlock],
}

/// Base set: all pairs with 3 <= y <= x <= 9.
pub static BASE_BLOCKS: [PairBlock; 1] = [PairBlock {
    x: 3..=9,
    y: 3..=9,
    lower_triangle: true,
}];

static LOW_RANGE: FeatureRule = FeatureRule {
    requires: &[],
    blocks: &[PairBlock {
        x: 2..=9,
        y: 2..=2,
        lower_triangle: false,
    }],
};

static MID_RANGE: FeatureRule = FeatureRule {
    requires: &[],
    blocks: &[PairBlock {
        x: 11..=19,
        y: 3..=9,
        lower_triangle: false,
    }],
};

static WIDE_RANGE: FeatureRule = FeatureRule {
    requires: &[Feature::MidRange],
    blocks: &[PairBlock {
        x: 11..=19,
        y: 11..=19,
        lower_triangle: true,
    }],
};

/// Named extension of the multiplication set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    LowRange,
    MidRange,
    WideRange,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::LowRange, Feature::MidRange, Feature::WideRange];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowRange => "low-range",
            Self::MidRange => "mid-range",
            Self::WideRange => "wide-range",
        }
    }

    pub fn rule(&self) -> &'static FeatureRule {
        match self {
            Self::LowRange => &LOW_RANGE,
            Self::MidRange => &MID_RANGE,
            Self::WideRange => &WIDE_RANGE,
        }
    }

    /// Features this one directly depends on.
    pub fn requires(&self) -> &'static [Feature] {
        self.rule().requires
    }

    /// Features that directly depend on this one.
    pub fn dependents(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| f.requires().contains(self))
            .collect()
    }

    /// Fresh cards this feature contributes.
    pub fn cards(&self) -> Vec<Card> {
        cards_from(self.rule().blocks)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| EngineError::UnknownFeature(s.to_string()))
    }
}

fn cards_from(blocks: &[PairBlock]) -> Vec<Card> {
    let mut seen = BTreeSet::new();
    blocks
        .iter()
        .flat_map(|block| block.prompts())
        .filter(|p| seen.insert(p.id()))
        .map(Card::new)
        .collect()
}

/// Fresh cards of the base set.
pub fn base_cards() -> Vec<Card> {
    cards_from(&BASE_BLOCKS)
}

/// Walk `edges` from `start` depth-first and return every reachable node,
/// each after the nodes it leads to. With prerequisite edges that puts
/// prerequisites first; with dependent edges it puts dependents first.
pub fn closure<F>(start: Feature, edges: F) -> Vec<Feature>
where
    F: Fn(Feature) -> Vec<Feature>,
{
    fn visit<F: Fn(Feature) -> Vec<Feature>>(
        node: Feature,
        edges: &F,
        seen: &mut BTreeSet<Feature>,
        order: &mut Vec<Feature>,
    ) {
        if !seen.insert(node) {
            return;
        }
        for next in edges(node) {
            visit(next, edges, seen, order);
        }
        order.push(node);
    }

    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    visit(start, &edges, &mut seen, &mut order);
    order
}

/// What a toggle changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureChange {
    pub activated: Vec<Feature>,
    pub deactivated: Vec<Feature>,
    pub cards_added: usize,
    pub cards_removed: usize,
}

/// Which features are switched on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeSet<Feature>);

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }

    /// Switch `feature` on together with anything it requires, adding their
    /// cards to `store`. Already active features are left alone.
    pub fn activate(&mut self, store: &mut CardStore, feature: Feature) -> FeatureChange {
        let mut change = FeatureChange::default();
        for f in closure(feature, |f| f.requires().to_vec()) {
            if self.0.insert(f) {
                change.cards_added += store.add_cards(f.as_str(), f.cards());
                change.activated.push(f);
            }
        }
        change
    }

    /// Switch `feature` off together with everything depending on it.
    ///
    /// Their cards and progress are deleted, except cards the base set or a
    /// remaining feature also produces. Deactivating an inactive feature
    /// does nothing.
    pub fn deactivate(&mut self, store: &mut CardStore, feature: Feature) -> FeatureChange {
        let mut change = FeatureChange::default();
        let leaving: Vec<Feature> = closure(feature, |f| f.dependents())
            .into_iter()
            .filter(|f| self.0.remove(f))
            .collect();
        if leaving.is_empty() {
            return change;
        }

        let mut kept: BTreeSet<CardId> = base_cards().into_iter().map(|c| c.id).collect();
        for f in self.iter() {
            kept.extend(f.cards().into_iter().map(|c| c.id));
        }

        for f in &leaving {
            let doomed: BTreeSet<CardId> = f
                .cards()
                .into_iter()
                .map(|c| c.id)
                .filter(|id| !kept.contains(id))
                .collect();
            change.cards_removed += store.remove_cards(f.as_str(), &doomed);
        }
        change.deactivated = leaving;
        change
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
