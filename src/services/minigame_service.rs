use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::MinigameEntity,
    dto::minigame::{CreateMinigameRequest, MinigameDto},
    error::ServiceError,
    state::SharedState,
};

/// Return every minigame, earliest window first.
pub async fn list_minigames(state: &SharedState) -> Result<Vec<MinigameDto>, ServiceError> {
    let store = state.store();
    Ok(store
        .list_minigames()
        .await?
        .into_iter()
        .map(MinigameDto::from)
        .collect())
}

pub async fn get_minigame(state: &SharedState, id: Uuid) -> Result<MinigameDto, ServiceError> {
    require_minigame(state, id).await.map(MinigameDto::from)
}

/// Validate and persist a new minigame.
pub async fn create_minigame(
    state: &SharedState,
    request: CreateMinigameRequest,
) -> Result<MinigameDto, ServiceError> {
    request
        .validate()
        .map_err(|err| ServiceError::InvalidInput(format!("validation failed: {err}")))?;

    let entity = request.into_entity();
    if entity.name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "minigame name must not be empty".into(),
        ));
    }

    state.store().save_minigame(entity.clone()).await?;
    info!(minigame_id = %entity.id, name = %entity.name, "minigame created");
    Ok(entity.into())
}

/// Load a minigame or fail with [`ServiceError::NotFound`].
pub(crate) async fn require_minigame(
    state: &SharedState,
    id: Uuid,
) -> Result<MinigameEntity, ServiceError> {
    state
        .store()
        .find_minigame(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("minigame `{id}` not found")))
}
