//! Player view of one minigame: registry fetch, grid projection and the claim flow.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    client::{ClientError, ClientResult, MinigameClient, scope::ViewScope, toast::Toaster},
    clock::Clock,
    dto::{draw::WinnerDto, minigame::MinigameDto, ticket::TicketsResponse},
    views::{
        grid::{ClickGuard, NumberGrid},
        selection::{SelectionEvent, SelectionFlow, SelectionPhase},
    },
};

/// Message toasted after a successful claim.
pub const TICKET_CONFIRMED_MESSAGE: &str = "Chọn số thành công!";

/// Everything the player screen of a minigame needs, bound to one view lifetime.
pub struct PlayerMinigameView {
    client: MinigameClient,
    minigame: MinigameDto,
    clock: Arc<dyn Clock>,
    toaster: Arc<dyn Toaster>,
    scope: ViewScope,
    registry: Option<TicketsResponse>,
    winners: Vec<WinnerDto>,
    flow: SelectionFlow,
}

impl PlayerMinigameView {
    pub fn new(
        client: MinigameClient,
        minigame: MinigameDto,
        clock: Arc<dyn Clock>,
        toaster: Arc<dyn Toaster>,
    ) -> Self {
        Self {
            client,
            minigame,
            clock,
            toaster,
            scope: ViewScope::new(),
            registry: None,
            winners: Vec::new(),
            flow: SelectionFlow::new(),
        }
    }

    pub fn minigame(&self) -> &MinigameDto {
        &self.minigame
    }

    /// Last registry snapshot, `None` until the first successful fetch.
    pub fn registry(&self) -> Option<&TicketsResponse> {
        self.registry.as_ref()
    }

    /// Winners from the last successful fetch.
    pub fn winners(&self) -> &[WinnerDto] {
        &self.winners
    }

    pub fn flow(&self) -> &SelectionFlow {
        &self.flow
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// True once the user holds a ticket for this minigame.
    pub fn holds_ticket(&self) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|registry| !registry.user_tickets.is_empty())
    }

    /// Refetch the registry and the winners. Failures are toasted and keep the
    /// previous snapshot; a closed view drops the response silently.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let id = self.minigame.id;
        let client = &self.client;
        let fetch = async {
            futures::try_join!(client.fetch_tickets(id), client.fetch_winners(id))
        };
        match self.scope.run(fetch).await {
            Ok((registry, winners)) => {
                self.registry = Some(registry);
                self.winners = winners;
                Ok(())
            }
            Err(err) => {
                self.report(&err, "failed to load ticket registry");
                Err(err)
            }
        }
    }

    /// Grid projection of the current snapshot, winners, pending selection and guards.
    pub fn grid(&self) -> NumberGrid {
        let taken = self
            .registry
            .iter()
            .flat_map(|registry| registry.ticket_stats.taken_numbers.iter().copied());
        let guard = ClickGuard {
            window_open: self.minigame.is_open_at(self.clock.now()),
            holds_ticket: self.holds_ticket(),
        };

        NumberGrid::new(self.minigame.max_number)
            .with_taken(taken)
            .with_winners(self.winners.iter().map(|winner| winner.ticket_number))
            .with_selection(self.flow.pending())
            .with_guard(guard)
    }

    /// Route a grid click into the flow. Returns whether the number became pending.
    pub fn click(&mut self, number: u32) -> bool {
        if self.flow.is_submitting() {
            return false;
        }
        let mut grid = self.grid();
        match grid.click(number) {
            Some(number) => self.flow.apply(SelectionEvent::Select(number)).is_ok(),
            None => false,
        }
    }

    /// Drop the pending number.
    pub fn cancel(&mut self) -> bool {
        self.flow.apply(SelectionEvent::Cancel).is_ok()
    }

    /// Submit the pending number. The registry is refetched whatever the outcome,
    /// so the grid reflects numbers taken concurrently by other players.
    pub async fn confirm(&mut self) -> ClientResult<()> {
        let Some(number) = self.flow.pending() else {
            return Ok(());
        };
        if self.flow.apply(SelectionEvent::Confirm).is_err() {
            return Ok(());
        }

        let id = self.minigame.id;
        let outcome = self.scope.run(self.client.select_ticket(id, number)).await;

        match outcome {
            Ok(ticket) => {
                info!(minigame = %id, number, "ticket confirmed");
                let _ = self.flow.apply(SelectionEvent::Succeeded(ticket));
                self.toaster.success(TICKET_CONFIRMED_MESSAGE);
                self.refresh().await
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(err) => {
                let _ = self
                    .flow
                    .apply(SelectionEvent::Rejected(err.toast_message()));
                let _ = self.flow.apply(SelectionEvent::Acknowledged);
                self.report(&err, "ticket claim rejected");
                // The refusal already reached the user; a failed refetch is toasted on its own.
                let _ = self.refresh().await;
                Err(err)
            }
        }
    }

    /// Phase of the claim flow, shortcut for rendering.
    pub fn phase(&self) -> &SelectionPhase {
        self.flow.phase()
    }

    /// End the view; responses still in flight are discarded.
    pub fn close(&self) {
        self.scope.close();
    }

    fn report(&self, err: &ClientError, context: &str) {
        if err.is_cancelled() {
            return;
        }
        warn!(minigame = %self.minigame.id, error = %err, "{context}");
        self.toaster.error(&err.toast_message());
    }
}
