//! Adaptive flashcard engine shared by the drill games.
//!
//! Provides:
//! - Card store with optional feature sets and dependency closure
//! - Weighted card selection (weak, strong, slow focus)
//! - Answer evaluation (numeric equality, Levenshtein typo tolerance)
//! - Five-level progress ladder and scoring with daily bonuses
//! - Round controller with a cancellable countdown
//! - Key-value storage collaborator

pub mod error;
pub mod features;
pub mod history;
pub mod matching;
pub mod progress;
pub mod round;
pub mod scoring;
pub mod selector;
pub mod stats;
pub mod storage;
pub mod store;
pub mod timer;
pub mod trainer;
pub mod types;

pub use error::{EngineError, Result, StorageError};
pub use features::{Feature, FeatureChange, FeatureSet};
pub use history::{GameResult, History};
pub use matching::{levenshtein_distance, Evaluation};
pub use round::{AnswerRecord, Round};
pub use stats::Stats;
pub use storage::{MemoryStorage, Storage};
pub use store::CardStore;
pub use timer::{Countdown, Tick, TimerToken};
pub use trainer::{AnswerOutcome, RoundView, TickOutcome, Trainer, Warning};
pub use types::{
    AnswerMode, Card, CardId, Focus, GameConfig, GameKind, Level, Prompt, Response, Seconds,
    Selection, Settings, Topic, WordEntry,
};
