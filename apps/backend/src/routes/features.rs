//! Feature toggle endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::{respond, trainer};
use crate::AppState;

/// GET /api/{game}/features
pub async fn list(
    State(state): State<AppState>,
    Path(game): Path<GameKind>,
) -> Result<Json<WithWarnings<FeaturesResponse>>> {
    let mut trainer = trainer(&state, game)?;
    let active = trainer.active_features();
    let available = match game {
        GameKind::Times => Feature::ALL
            .into_iter()
            .map(|id| FeatureInfo {
                id,
                active: active.contains(&id),
                requires: id.requires().to_vec(),
                cards: id.cards().len(),
            })
            .collect(),
        GameKind::Vocab => Vec::new(),
    };
    Ok(respond(&mut trainer, FeaturesResponse { active, available }))
}

/// PUT /api/{game}/features/{id}
pub async fn toggle(
    State(state): State<AppState>,
    Path((game, feature)): Path<(GameKind, String)>,
    Json(request): Json<ToggleFeatureRequest>,
) -> Result<Json<WithWarnings<FeatureChange>>> {
    let feature: Feature = feature.parse()?;
    let mut trainer = trainer(&state, game)?;
    let change = trainer.toggle_feature(feature, request.active, request.confirmed)?;
    Ok(respond(&mut trainer, change))
}
