//! Core types shared by the multiplication and vocabulary games.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Lowest rung of the difficulty ladder (least practiced).
pub const MIN_LEVEL: u8 = 1;
/// Highest rung of the difficulty ladder (mastered).
pub const MAX_LEVEL: u8 = 5;
/// Fastest latency a card can record.
pub const MIN_SECONDS: f64 = 0.1;
/// Slowest latency a card can record, also the starting time of new cards.
pub const MAX_SECONDS: f64 = 60.0;
/// Cards drawn per round unless the config says otherwise.
pub const DEFAULT_ROUND_SIZE: usize = 10;

/// Which of the two games a trainer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    /// Multiplication tables, numeric answers.
    Times,
    /// English to German vocabulary, text answers.
    Vocab,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Times => "times",
            Self::Vocab => "vocab",
        }
    }

    /// Storage key for one of this game's datasets, e.g. `times.cards`.
    pub fn key(&self, dataset: &str) -> String {
        format!("{}.{}", self.as_str(), dataset)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mastery level of a card, 1 (hardest) through 5 (mastered).
///
/// Values read from storage are clamped onto the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const LOWEST: Level = Level(MIN_LEVEL);
    pub const HIGHEST: Level = Level(MAX_LEVEL);

    /// Create a level that is known to be on the ladder.
    pub fn new(value: u8) -> Self {
        debug_assert!(
            (MIN_LEVEL..=MAX_LEVEL).contains(&value),
            "level {value} outside [{MIN_LEVEL}, {MAX_LEVEL}]"
        );
        Self::clamped(i64::from(value))
    }

    /// Create a level from an arbitrary integer, clamping onto the ladder.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(MIN_LEVEL), i64::from(MAX_LEVEL)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// One rung up, saturating at 5.
    pub fn raised(self) -> Self {
        Self((self.0 + 1).min(MAX_LEVEL))
    }

    /// One rung down, saturating at 1.
    pub fn lowered(self) -> Self {
        Self(self.0.saturating_sub(1).max(MIN_LEVEL))
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::LOWEST
    }
}

impl From<i64> for Level {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

/// Response latency in seconds, bounded to `[0.1, 60]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Seconds(f64);

impl Seconds {
    pub const FASTEST: Seconds = Seconds(MIN_SECONDS);
    pub const SLOWEST: Seconds = Seconds(MAX_SECONDS);

    /// Clamp `value` into bounds. NaN counts as the slowest possible answer.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::SLOWEST;
        }
        Self(value.clamp(MIN_SECONDS, MAX_SECONDS))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Seconds {
    fn default() -> Self {
        Self::SLOWEST
    }
}

impl From<f64> for Seconds {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Seconds> for f64 {
    fn from(seconds: Seconds) -> Self {
        seconds.0
    }
}

/// Stable identity of a card, derived from its prompt.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vocabulary entry as it appears in a word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub en: String,
    pub de: String,
    pub unit: String,
}

/// What the learner is asked. Variant-specific payload of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    /// `x × y`, stored with `x >= y`.
    Product { x: u8, y: u8 },
    /// Translate `en` into `de`.
    Word { en: String, de: String, unit: String },
}

impl Prompt {
    /// Build a product prompt; operand order does not matter.
    pub fn product(a: u8, b: u8) -> Self {
        Self::Product {
            x: a.max(b),
            y: a.min(b),
        }
    }

    pub fn word(entry: WordEntry) -> Self {
        Self::Word {
            en: entry.en,
            de: entry.de,
            unit: entry.unit,
        }
    }

    pub fn id(&self) -> CardId {
        match self {
            Self::Product { x, y } => CardId(format!("{x}x{y}")),
            Self::Word { en, unit, .. } => CardId(format!("{unit}:{en}")),
        }
    }

    /// Text shown to the learner.
    pub fn question(&self) -> String {
        match self {
            Self::Product { x, y } => format!("{x} × {y}"),
            Self::Word { en, .. } => en.clone(),
        }
    }

    /// The answer a correct response must produce.
    pub fn expected_answer(&self) -> String {
        match self {
            Self::Product { x, y } => (u32::from(*x) * u32::from(*y)).to_string(),
            Self::Word { de, .. } => de.clone(),
        }
    }

    /// Whether this prompt belongs to `topic`. A product belongs to both of
    /// its factors.
    pub fn matches(&self, topic: &Topic) -> bool {
        match (self, topic) {
            (Self::Product { x, y }, Topic::Factor(f)) => x == f || y == f,
            (Self::Word { unit, .. }, Topic::Unit(u)) => unit == u,
            _ => false,
        }
    }

    pub fn is_square(&self) -> bool {
        matches!(self, Self::Product { x, y } if x == y)
    }
}

/// How the learner answers a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    /// Learner types the answer.
    #[default]
    Typed,
    /// Learner recalls the answer without typing, then grades themselves.
    Flip,
}

/// One learnable item and its progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub prompt: Prompt,
    pub level: Level,
    /// Latency of the last correct typed answer.
    pub time: Seconds,
    /// Latency of the last correct self-graded answer (vocabulary only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blind_time: Option<Seconds>,
}

impl Card {
    /// A fresh card at level 1 with the slowest recorded time.
    pub fn new(prompt: Prompt) -> Self {
        let blind_time = match prompt {
            Prompt::Word { .. } => Some(Seconds::SLOWEST),
            Prompt::Product { .. } => None,
        };
        Self {
            id: prompt.id(),
            prompt,
            level: Level::LOWEST,
            time: Seconds::SLOWEST,
            blind_time,
        }
    }

    /// The recorded time relevant for `mode`.
    pub fn time_for(&self, mode: AnswerMode) -> Seconds {
        match mode {
            AnswerMode::Typed => self.time,
            AnswerMode::Flip => self.blind_time.unwrap_or(self.time),
        }
    }

    pub(crate) fn set_time_for(&mut self, mode: AnswerMode, seconds: Seconds) {
        match mode {
            AnswerMode::Typed => self.time = seconds,
            AnswerMode::Flip => self.blind_time = Some(seconds),
        }
    }
}

/// Topic a selection can name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Topic {
    /// A multiplication factor.
    Factor(u8),
    /// A vocabulary unit.
    Unit(String),
}

/// Which cards a round may draw from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "topics", rename_all = "snake_case")]
pub enum Selection {
    /// Every card in the store.
    #[default]
    All,
    /// Perfect squares (`x × x`).
    Squares,
    /// Cards matching at least one topic.
    Topics(BTreeSet<Topic>),
}

impl Selection {
    pub fn accepts(&self, card: &Card) -> bool {
        match self {
            Self::All => true,
            Self::Squares => card.prompt.is_square(),
            Self::Topics(topics) => topics.iter().any(|t| card.prompt.matches(t)),
        }
    }
}

/// Weighting strategy for drawing cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    /// Favour low levels.
    #[default]
    Weak,
    /// Favour high levels.
    Strong,
    /// Favour slow recorded times.
    Slow,
}

fn default_round_size() -> usize {
    DEFAULT_ROUND_SIZE
}

/// Parameters of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub selection: Selection,
    #[serde(default)]
    pub focus: Focus,
    #[serde(default = "default_round_size")]
    pub size: usize,
    #[serde(default)]
    pub mode: AnswerMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            selection: Selection::All,
            focus: Focus::Weak,
            size: DEFAULT_ROUND_SIZE,
            mode: AnswerMode::Typed,
        }
    }
}

/// What the learner submitted for a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Typed { text: String },
    SelfGraded { recalled: bool },
    /// The countdown ran out before an answer arrived.
    Timeout,
}

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Countdown per card, in seconds.
    pub round_seconds: f64,
    /// Largest edit distance still accepted for text answers.
    pub typo_threshold: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_seconds: MAX_SECONDS,
            typo_threshold: crate::matching::TYPO_THRESHOLD,
        }
    }
}
