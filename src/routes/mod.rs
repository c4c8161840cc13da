use axum::{Router, middleware};

use crate::state::SharedState;

pub mod auth;
pub mod docs;
pub mod extract;
pub mod health;
pub mod minigames;

/// Compose all route trees, wiring in shared state and documentation routes.
///
/// Everything under `/minigames` requires a bearer token; health and docs are open.
pub fn router(state: SharedState) -> Router<()> {
    let minigame_router = minigames::router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_user,
    ));

    let api_router = health::router().merge(minigame_router);
    api_router.merge(docs::router()).with_state(state)
}
