//! Card, history and stats endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::{respond, trainer};
use crate::AppState;

/// GET /api/{game}/cards
pub async fn list(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
) -> Result<Json<WithWarnings<CardsResponse>>> {
    let mut trainer = trainer(&state, game)?;
    let response = CardsResponse {
        cards: trainer.cards().cloned().collect(),
        topics: trainer.topics().into_iter().collect(),
    };
    Ok(respond(&mut trainer, response))
}

/// GET /api/{game}/cards/{id}
pub async fn get(
    State(state): State<AppState>,
    Path((game, id)): Path<(GameKind, CardId)>,
) -> Result<Json<WithWarnings<Card>>> {
    let mut trainer = trainer(&state, game)?;
    let card = trainer
        .card(&id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("card {id}")))?;
    Ok(respond(&mut trainer, card))
}

/// POST /api/{game}/cards/reset
pub async fn reset(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
    Json(request): Json<ResetProgressRequest>,
) -> Result<Json<WithWarnings<ResetProgressResponse>>> {
    let mut trainer = trainer(&state, game)?;
    let reset = trainer.reset_progress(request.confirmed)?;
    Ok(respond(&mut trainer, ResetProgressResponse { reset }))
}

/// GET /api/{game}/history
pub async fn history(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
) -> Result<Json<WithWarnings<Vec<GameResult>>>> {
    let mut trainer = trainer(&state, game)?;
    let history = trainer.history().as_slice().to_vec();
    Ok(respond(&mut trainer, history))
}

/// GET /api/{game}/stats
pub async fn stats(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
) -> Result<Json<WithWarnings<Stats>>> {
    let mut trainer = trainer(&state, game)?;
    let stats = trainer.stats();
    Ok(respond(&mut trainer, stats))
}

/// GET /api/{game}/config
///
/// The config of the most recent round, `null` before the first one.
pub async fn last_config(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
) -> Result<Json<WithWarnings<Option<GameConfig>>>> {
    let mut trainer = trainer(&state, game)?;
    let config = trainer.last_config().cloned();
    Ok(respond(&mut trainer, config))
}
