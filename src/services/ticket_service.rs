//! Ticket registry: the per-minigame view of taken numbers and number claims.

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dao::models::{ClaimOutcome, TicketClaim},
    dto::ticket::{TicketDto, TicketStatsDto, TicketsResponse},
    error::ServiceError,
    services::minigame_service::require_minigame,
    state::{AuthUser, SharedState},
};

/// Read the ledger of a minigame and project it for `user`.
pub async fn list_tickets(
    state: &SharedState,
    minigame_id: Uuid,
    user: &AuthUser,
) -> Result<TicketsResponse, ServiceError> {
    let minigame = require_minigame(state, minigame_id).await?;
    let ledger = state.store().ledger(minigame_id).await?;

    let ticket_stats = TicketStatsDto::compute(minigame.max_number, ledger.tickets.keys().copied());
    let tickets: Vec<TicketDto> = ledger
        .tickets
        .into_values()
        .map(TicketDto::from)
        .collect();
    let user_tickets = tickets
        .iter()
        .filter(|ticket| ticket.user_id == user.id)
        .cloned()
        .collect();

    Ok(TicketsResponse {
        tickets,
        ticket_stats,
        user_tickets,
    })
}

/// Claim `number` for `user`. Uniqueness is decided by the store under its ledger lock.
pub async fn select_ticket(
    state: &SharedState,
    minigame_id: Uuid,
    user: &AuthUser,
    number: u32,
) -> Result<TicketDto, ServiceError> {
    let minigame = require_minigame(state, minigame_id).await?;
    let now = state.now();

    if !minigame.is_open_at(now) {
        return Err(ServiceError::InvalidInput(
            "minigame is not open for ticket registration".into(),
        ));
    }
    if !minigame.contains_number(number) {
        return Err(ServiceError::InvalidInput(format!(
            "number must be between 1 and {}",
            minigame.max_number
        )));
    }

    let claim = TicketClaim {
        minigame_id,
        user_id: user.id.clone(),
        number,
        claimed_at: now,
    };

    match state.store().claim_ticket(claim).await? {
        ClaimOutcome::Claimed(ticket) => {
            info!(%minigame_id, user_id = %user.id, number, "ticket claimed");
            Ok(ticket.into())
        }
        ClaimOutcome::NumberTaken => {
            debug!(%minigame_id, user_id = %user.id, number, "number already taken");
            Err(ServiceError::Conflict(format!(
                "number {number} is already taken"
            )))
        }
        ClaimOutcome::AlreadyHolding(existing) => Err(ServiceError::Conflict(format!(
            "you already hold number {} in this minigame",
            existing.number
        ))),
        ClaimOutcome::UnknownMinigame => Err(ServiceError::NotFound(format!(
            "minigame `{minigame_id}` not found"
        ))),
    }
}
