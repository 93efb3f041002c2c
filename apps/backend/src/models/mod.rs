//! API request and response types

use serde::{Deserialize, Serialize};

// Re-export shared types from flashdrill-core
pub use flashdrill_core::{
    AnswerOutcome, Card, CardId, Feature, FeatureChange, GameConfig, GameKind, GameResult,
    Response, RoundView, Stats, TickOutcome, TimerToken, Topic, Warning,
};

// === Response Envelope ===

/// Any payload plus the storage warnings collected while producing it.
#[derive(Debug, Serialize)]
pub struct WithWarnings<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

// === Cards ===

#[derive(Debug, Serialize)]
pub struct CardsResponse {
    pub cards: Vec<Card>,
    /// Topics a round selection can name.
    pub topics: Vec<Topic>,
}

#[derive(Debug, Deserialize)]
pub struct ResetProgressRequest {
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct ResetProgressResponse {
    pub reset: usize,
}

// === Features ===

#[derive(Debug, Serialize)]
pub struct FeatureInfo {
    pub id: Feature,
    pub active: bool,
    pub requires: Vec<Feature>,
    /// Cards the feature contributes when active.
    pub cards: usize,
}

#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    pub active: Vec<Feature>,
    pub available: Vec<FeatureInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleFeatureRequest {
    pub active: bool,
    #[serde(default)]
    pub confirmed: bool,
}

// === Rounds ===

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub card_id: CardId,
    pub response: Response,
    /// Seconds the learner took.
    pub elapsed: f64,
}

#[derive(Debug, Deserialize)]
pub struct TickRequest {
    pub token: TimerToken,
    /// Seconds since the previous tick.
    pub elapsed: f64,
}

#[derive(Debug, Serialize)]
pub struct AbandonResponse {
    pub abandoned: bool,
}
