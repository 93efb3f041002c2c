//! Error types for flashdrill-core.

use crate::features::Feature;
use crate::types::{CardId, GameKind};
use thiserror::Error;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced to the caller of the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no cards match this selection")]
    EmptySelection,

    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("turning off {0} deletes its cards and progress; confirmation required")]
    ConfirmationRequired(Feature),

    #[error("resetting progress deletes every level and time; confirmation required")]
    ResetNotConfirmed,

    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("the {0} game has no optional features")]
    FeaturesUnsupported(GameKind),

    #[error("no round in progress")]
    NoActiveRound,

    #[error("a round is already in progress")]
    RoundInProgress,

    #[error("card {0} is not awaiting an answer")]
    NotCurrentCard(CardId),

    #[error("every card of this round has been answered")]
    RoundComplete,

    #[error("nothing has been answered in this round")]
    NothingAnswered,

    #[error("card {0} is no longer in the store")]
    CardMissing(CardId),
}

/// Errors raised by a storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
