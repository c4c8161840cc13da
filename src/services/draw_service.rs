//! Business logic of the admin draw: uncommitted previews, winner commits and resets.

use rand::{rng, seq::IndexedRandom};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::{CommitOutcome, LedgerSnapshot, MinigameEntity, TicketEntity, WinnerCommit},
    dto::draw::{DrawRequest, DrawResponse, PotentialWinnerDto, WinnerDto},
    error::ServiceError,
    services::minigame_service::require_minigame,
    state::SharedState,
};

/// Run a preview or a commit depending on `request.confirm`.
pub async fn draw(
    state: &SharedState,
    minigame_id: Uuid,
    request: DrawRequest,
) -> Result<DrawResponse, ServiceError> {
    let minigame = require_minigame(state, minigame_id).await?;
    let ledger = state.store().ledger(minigame_id).await?;
    ensure_below_cap(&minigame, &ledger)?;

    if request.confirm {
        let winner = commit(state, &minigame, &ledger, request.ticket_number).await?;
        Ok(DrawResponse {
            potential_winner: None,
            winner: Some(winner),
        })
    } else {
        let ticket = pick_eligible(&ledger)?;
        Ok(DrawResponse {
            potential_winner: Some(PotentialWinnerDto {
                ticket_id: ticket.id,
                number: ticket.number,
                user: state.users().summary(&ticket.user_id),
            }),
            winner: None,
        })
    }
}

/// Committed winners in draw order.
pub async fn list_winners(
    state: &SharedState,
    minigame_id: Uuid,
) -> Result<Vec<WinnerDto>, ServiceError> {
    require_minigame(state, minigame_id).await?;
    let ledger = state.store().ledger(minigame_id).await?;
    Ok(ledger.winners.into_iter().map(WinnerDto::from).collect())
}

/// Delete every winner of the minigame; tickets stay and become eligible again.
pub async fn reset_winners(state: &SharedState, minigame_id: Uuid) -> Result<(), ServiceError> {
    require_minigame(state, minigame_id).await?;
    let cleared = state.store().clear_winners(minigame_id).await?;
    info!(%minigame_id, cleared, "winners reset");
    Ok(())
}

fn ensure_below_cap(minigame: &MinigameEntity, ledger: &LedgerSnapshot) -> Result<(), ServiceError> {
    if ledger.winners.len() >= minigame.max_winners as usize {
        return Err(ServiceError::Conflict(format!(
            "all {} winners have already been drawn",
            minigame.max_winners
        )));
    }
    Ok(())
}

fn pick_eligible(ledger: &LedgerSnapshot) -> Result<&TicketEntity, ServiceError> {
    ledger
        .eligible_tickets()
        .choose(&mut rng())
        .copied()
        .ok_or_else(|| ServiceError::InvalidInput("no eligible tickets left to draw".into()))
}

async fn commit(
    state: &SharedState,
    minigame: &MinigameEntity,
    ledger: &LedgerSnapshot,
    ticket_number: Option<u32>,
) -> Result<WinnerDto, ServiceError> {
    let ticket_number = match ticket_number {
        Some(number) => number,
        None => pick_eligible(ledger)?.number,
    };

    let outcome = state
        .store()
        .commit_winner(WinnerCommit {
            minigame_id: minigame.id,
            ticket_number,
            max_winners: minigame.max_winners,
            drawn_at: state.now(),
        })
        .await?;

    match outcome {
        CommitOutcome::Committed(winner) => {
            info!(
                minigame_id = %minigame.id,
                ticket_number,
                user_id = %winner.user_id,
                "winner committed"
            );
            Ok(winner.into())
        }
        CommitOutcome::CapReached => Err(ServiceError::Conflict(format!(
            "all {} winners have already been drawn",
            minigame.max_winners
        ))),
        CommitOutcome::AlreadyWinner => {
            warn!(minigame_id = %minigame.id, ticket_number, "ticket drawn twice");
            Err(ServiceError::Conflict(format!(
                "ticket {ticket_number} has already won"
            )))
        }
        CommitOutcome::UnknownTicket => Err(ServiceError::InvalidInput(format!(
            "no ticket holds number {ticket_number}"
        ))),
        CommitOutcome::UnknownMinigame => Err(ServiceError::NotFound(format!(
            "minigame `{}` not found",
            minigame.id
        ))),
    }
}
