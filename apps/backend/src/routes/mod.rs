pub mod cards;
pub mod features;
pub mod rounds;

use std::sync::MutexGuard;

use axum::Json;
use flashdrill_core::{GameKind, Trainer};

use crate::error::{ApiError, Result};
use crate::models::WithWarnings;
use crate::AppState;

/// Lock the trainer of `game`.
pub(crate) fn trainer(state: &AppState, game: GameKind) -> Result<MutexGuard<'_, Trainer>> {
    state
        .trainer(game)
        .lock()
        .map_err(|_| ApiError::Internal(format!("{game} trainer lock poisoned")))
}

/// Wrap `data` together with the trainer's pending storage warnings.
pub(crate) fn respond<T>(trainer: &mut Trainer, data: T) -> Json<WithWarnings<T>> {
    Json(WithWarnings {
        data,
        warnings: trainer.take_warnings(),
    })
}
