//! Round endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use flashdrill_core::EngineError;

use crate::error::Result;
use crate::models::*;
use crate::routes::{respond, trainer};
use crate::AppState;

/// POST /api/{game}/rounds
pub async fn start(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
    Json(config): Json<GameConfig>,
) -> Result<(StatusCode, Json<WithWarnings<RoundView>>)> {
    let mut trainer = trainer(&state, game)?;
    let view = trainer.start_round(config)?;
    Ok((StatusCode::CREATED, respond(&mut trainer, view)))
}

/// GET /api/{game}/rounds/current
pub async fn current(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
) -> Result<Json<WithWarnings<RoundView>>> {
    let mut trainer = trainer(&state, game)?;
    let view = trainer.round_view().ok_or(EngineError::NoActiveRound)?;
    Ok(respond(&mut trainer, view))
}

/// POST /api/{game}/rounds/current/answers
pub async fn answer(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<WithWarnings<AnswerOutcome>>> {
    let mut trainer = trainer(&state, game)?;
    let outcome = trainer.submit_answer(&request.card_id, request.response, request.elapsed)?;
    Ok(respond(&mut trainer, outcome))
}

/// POST /api/{game}/rounds/current/tick
pub async fn tick(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
    Json(request): Json<TickRequest>,
) -> Result<Json<WithWarnings<TickOutcome>>> {
    let mut trainer = trainer(&state, game)?;
    let outcome = trainer.tick(request.token, request.elapsed)?;
    Ok(respond(&mut trainer, outcome))
}

/// POST /api/{game}/rounds/current/finish
pub async fn finish(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
) -> Result<Json<WithWarnings<GameResult>>> {
    let mut trainer = trainer(&state, game)?;
    let result = trainer.finish_round()?;
    Ok(respond(&mut trainer, result))
}

/// DELETE /api/{game}/rounds/current
pub async fn abandon(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
) -> Result<Json<WithWarnings<AbandonResponse>>> {
    let mut trainer = trainer(&state, game)?;
    let abandoned = trainer.abandon_round();
    Ok(respond(&mut trainer, AbandonResponse { abandoned }))
}
