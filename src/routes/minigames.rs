use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        draw::{DrawRequest, DrawResponse, WinnerDto},
        minigame::{CreateMinigameRequest, MinigameDto},
        ticket::{SelectTicketRequest, TicketDto, TicketsResponse},
    },
    error::AppError,
    routes::extract::ApiJson,
    services::{draw_service, minigame_service, ticket_service},
    state::{AuthUser, SharedState},
};

/// Minigame, ticket registry and draw endpoints. Mounted behind the bearer-token layer.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/minigames", get(list_minigames).post(create_minigame))
        .route("/minigames/{id}", get(get_minigame))
        .route(
            "/minigames/{id}/tickets",
            get(list_tickets).post(select_ticket),
        )
        .route("/minigames/{id}/draw", post(draw))
        .route(
            "/minigames/{id}/winners",
            get(list_winners).delete(reset_winners),
        )
}

/// List every minigame.
#[utoipa::path(
    get,
    path = "/minigames",
    tag = "minigames",
    params(("Authorization" = String, Header, description = "Bearer token issued by the identity provider")),
    responses(
        (status = 200, description = "Known minigames", body = [MinigameDto]),
        (status = 401, description = "Missing or unknown token", body = crate::dto::ErrorBody)
    )
)]
pub async fn list_minigames(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MinigameDto>>, AppError> {
    Ok(Json(minigame_service::list_minigames(&state).await?))
}

/// Create a minigame (admin only).
#[utoipa::path(
    post,
    path = "/minigames",
    tag = "minigames",
    params(("Authorization" = String, Header, description = "Bearer token of an admin account")),
    request_body = CreateMinigameRequest,
    responses(
        (status = 201, description = "Minigame created", body = MinigameDto),
        (status = 400, description = "Invalid definition", body = crate::dto::ErrorBody),
        (status = 403, description = "Caller is not an admin", body = crate::dto::ErrorBody)
    )
)]
pub async fn create_minigame(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Valid(Json(payload)): Valid<Json<CreateMinigameRequest>>,
) -> Result<(StatusCode, Json<MinigameDto>), AppError> {
    user.ensure_admin()?;
    let minigame = minigame_service::create_minigame(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(minigame)))
}

/// Retrieve a minigame by its identifier.
#[utoipa::path(
    get,
    path = "/minigames/{id}",
    tag = "minigames",
    params(("Authorization" = String, Header, description = "Bearer token issued by the identity provider"),
    ("id" = Uuid, Path, description = "Identifier of the minigame")),
    responses(
        (status = 200, description = "Minigame", body = MinigameDto),
        (status = 404, description = "Unknown minigame", body = crate::dto::ErrorBody)
    )
)]
pub async fn get_minigame(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MinigameDto>, AppError> {
    Ok(Json(minigame_service::get_minigame(&state, id).await?))
}

/// Ticket registry of a minigame: every ticket, the stats and the caller's own tickets.
#[utoipa::path(
    get,
    path = "/minigames/{id}/tickets",
    tag = "tickets",
    params(("Authorization" = String, Header, description = "Bearer token issued by the identity provider"),
    ("id" = Uuid, Path, description = "Identifier of the minigame")),
    responses(
        (status = 200, description = "Ticket registry", body = TicketsResponse),
        (status = 404, description = "Unknown minigame", body = crate::dto::ErrorBody)
    )
)]
pub async fn list_tickets(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<TicketsResponse>, AppError> {
    Ok(Json(ticket_service::list_tickets(&state, id, &user).await?))
}

/// Claim a number for the caller.
#[utoipa::path(
    post,
    path = "/minigames/{id}/tickets",
    tag = "tickets",
    params(("Authorization" = String, Header, description = "Bearer token issued by the identity provider"),
    ("id" = Uuid, Path, description = "Identifier of the minigame")),
    request_body = SelectTicketRequest,
    responses(
        (status = 201, description = "Ticket created", body = TicketDto),
        (status = 400, description = "Number out of range or minigame closed", body = crate::dto::ErrorBody),
        (status = 409, description = "Number taken or caller already holds a ticket", body = crate::dto::ErrorBody)
    )
)]
pub async fn select_ticket(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<SelectTicketRequest>,
) -> Result<(StatusCode, Json<TicketDto>), AppError> {
    let ticket = ticket_service::select_ticket(&state, id, &user, payload.number).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Preview (`confirm = false`) or commit (`confirm = true`) a random draw (admin only).
#[utoipa::path(
    post,
    path = "/minigames/{id}/draw",
    tag = "draw",
    params(("Authorization" = String, Header, description = "Bearer token of an admin account"),
    ("id" = Uuid, Path, description = "Identifier of the minigame")),
    request_body = DrawRequest,
    responses(
        (status = 200, description = "Potential winner or committed winner", body = DrawResponse),
        (status = 400, description = "No eligible tickets", body = crate::dto::ErrorBody),
        (status = 409, description = "Winner cap reached", body = crate::dto::ErrorBody)
    )
)]
pub async fn draw(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<DrawRequest>,
) -> Result<Json<DrawResponse>, AppError> {
    user.ensure_admin()?;
    Ok(Json(draw_service::draw(&state, id, payload).await?))
}

/// Committed winners of a minigame, in draw order.
#[utoipa::path(
    get,
    path = "/minigames/{id}/winners",
    tag = "draw",
    params(("Authorization" = String, Header, description = "Bearer token issued by the identity provider"),
    ("id" = Uuid, Path, description = "Identifier of the minigame")),
    responses((status = 200, description = "Winners", body = [WinnerDto]))
)]
pub async fn list_winners(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<WinnerDto>>, AppError> {
    Ok(Json(draw_service::list_winners(&state, id).await?))
}

/// Delete every winner of a minigame (admin only).
#[utoipa::path(
    delete,
    path = "/minigames/{id}/winners",
    tag = "draw",
    params(("Authorization" = String, Header, description = "Bearer token of an admin account"),
    ("id" = Uuid, Path, description = "Identifier of the minigame")),
    responses(
        (status = 204, description = "Winners deleted"),
        (status = 403, description = "Caller is not an admin", body = crate::dto::ErrorBody)
    )
)]
pub async fn reset_winners(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.ensure_admin()?;
    draw_service::reset_winners(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
