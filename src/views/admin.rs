//! Admin draw controller: preview, commit and reset, each guarded by its busy flag.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    client::{ClientError, ClientResult, MinigameClient, scope::ViewScope, toast::Toaster},
    dto::draw::{DrawRequest, PotentialWinnerDto, WinnerDto},
    views::draw_panel::{DrawAction, DrawPanel},
};

/// Question asked before wiping the winners of a minigame.
pub const RESET_PROMPT: &str = "Xóa toàn bộ người trúng thưởng của minigame này?";
/// Message toasted after a committed draw.
pub const WINNER_CONFIRMED_MESSAGE: &str = "Đã xác nhận người trúng thưởng.";
/// Message toasted after a reset.
pub const WINNERS_RESET_MESSAGE: &str = "Đã xóa danh sách người trúng thưởng.";

/// Admin draw view. Clones share the panel and the view lifetime, so concurrent
/// button presses from several tasks see the same busy flags.
#[derive(Clone)]
pub struct AdminDrawView {
    client: MinigameClient,
    minigame_id: Uuid,
    toaster: Arc<dyn Toaster>,
    scope: Arc<ViewScope>,
    panel: Arc<Mutex<DrawPanel>>,
}

impl AdminDrawView {
    pub fn new(client: MinigameClient, minigame_id: Uuid, toaster: Arc<dyn Toaster>) -> Self {
        Self {
            client,
            minigame_id,
            toaster,
            scope: Arc::new(ViewScope::new()),
            panel: Arc::new(Mutex::new(DrawPanel::default())),
        }
    }

    /// Copy of the panel state for rendering.
    pub fn panel(&self) -> DrawPanel {
        self.lock().clone()
    }

    pub async fn refresh_winners(&self) -> ClientResult<Vec<WinnerDto>> {
        match self
            .scope
            .run(self.client.fetch_winners(self.minigame_id))
            .await
        {
            Ok(winners) => {
                self.lock().set_winners(winners.clone());
                Ok(winners)
            }
            Err(err) => {
                self.report(&err, "failed to load winners");
                Err(err)
            }
        }
    }

    /// Ask the server for a random candidate. Returns `Ok(None)` when a preview is
    /// already in flight. Nothing is persisted.
    pub async fn preview(&self) -> ClientResult<Option<PotentialWinnerDto>> {
        if !self.lock().begin(DrawAction::Preview) {
            return Ok(None);
        }

        let outcome = self
            .scope
            .run(self.client.draw(self.minigame_id, &DrawRequest::preview()))
            .await
            .and_then(|response| {
                response.potential_winner.ok_or_else(|| ClientError::Unexpected {
                    path: format!("minigames/{}/draw", self.minigame_id),
                    detail: "preview response without a potential winner".into(),
                })
            });

        match outcome {
            Ok(candidate) => {
                self.lock().preview_succeeded(candidate.clone());
                Ok(Some(candidate))
            }
            Err(err) => {
                self.lock().fail(DrawAction::Preview);
                self.report(&err, "draw preview failed");
                Err(err)
            }
        }
    }

    /// Commit the previewed number, or let the server pick one when nothing is
    /// previewed. Returns `Ok(None)` when a commit is already in flight.
    pub async fn confirm(&self) -> ClientResult<Option<WinnerDto>> {
        let ticket_number = {
            let mut panel = self.lock();
            let previewed = panel.previewed_number();
            if !panel.begin(DrawAction::Confirm) {
                return Ok(None);
            }
            previewed
        };

        let outcome = self
            .scope
            .run(
                self.client
                    .draw(self.minigame_id, &DrawRequest::confirm(ticket_number)),
            )
            .await
            .and_then(|response| {
                response.winner.ok_or_else(|| ClientError::Unexpected {
                    path: format!("minigames/{}/draw", self.minigame_id),
                    detail: "confirm response without a winner".into(),
                })
            });

        match outcome {
            Ok(winner) => {
                info!(
                    minigame = %self.minigame_id,
                    number = winner.ticket_number,
                    "winner committed"
                );
                self.lock().confirm_succeeded();
                self.toaster.success(WINNER_CONFIRMED_MESSAGE);
                // The commit stands even if the list cannot be reloaded right now.
                let _ = self.refresh_winners().await;
                Ok(Some(winner))
            }
            Err(err) => {
                self.lock().fail(DrawAction::Confirm);
                self.report(&err, "draw commit failed");
                Err(err)
            }
        }
    }

    /// Hide the preview card without committing anything.
    pub fn discard(&self) {
        self.lock().discard();
    }

    /// Wipe every winner after `prompt` approves [`RESET_PROMPT`], then refetch the list.
    /// A declined prompt, or a reset or commit already in flight, sends nothing and
    /// returns `Ok(false)`.
    pub async fn reset(&self, prompt: impl FnOnce(&str) -> bool) -> ClientResult<bool> {
        let busy = self.lock().busy();
        if busy.resetting || busy.confirming || !prompt(RESET_PROMPT) {
            return Ok(false);
        }
        if !self.lock().begin(DrawAction::Reset) {
            return Ok(false);
        }

        match self
            .scope
            .run(self.client.reset_winners(self.minigame_id))
            .await
        {
            Ok(()) => {
                info!(minigame = %self.minigame_id, "winners reset");
                self.lock().reset_succeeded();
                self.toaster.success(WINNERS_RESET_MESSAGE);
                // The reset stands even if the list cannot be reloaded right now.
                let _ = self.refresh_winners().await;
                Ok(true)
            }
            Err(err) => {
                self.lock().fail(DrawAction::Reset);
                self.report(&err, "winner reset failed");
                Err(err)
            }
        }
    }

    /// End the view; responses still in flight are discarded.
    pub fn close(&self) {
        self.scope.close();
    }

    fn lock(&self) -> MutexGuard<'_, DrawPanel> {
        self.panel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn report(&self, err: &ClientError, context: &str) {
        if err.is_cancelled() {
            return;
        }
        warn!(minigame = %self.minigame_id, error = %err, "{context}");
        self.toaster.error(&err.toast_message());
    }
}
