mod memory;

pub use memory::InMemoryMinigameStore;

use crate::dao::models::{
    ClaimOutcome, CommitOutcome, LedgerSnapshot, MinigameEntity, TicketClaim, WinnerCommit,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for minigames and their ledgers.
///
/// Implementations must decide [`claim_ticket`](Self::claim_ticket),
/// [`commit_winner`](Self::commit_winner) and [`clear_winners`](Self::clear_winners)
/// atomically per minigame: the uniqueness of ticket numbers, the one ticket per user
/// rule and the winner cap are enforced here and nowhere else.
pub trait MinigameStore: Send + Sync {
    fn save_minigame(&self, minigame: MinigameEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_minigame(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MinigameEntity>>>;
    fn list_minigames(&self) -> BoxFuture<'static, StorageResult<Vec<MinigameEntity>>>;
    fn ledger(&self, minigame_id: Uuid) -> BoxFuture<'static, StorageResult<LedgerSnapshot>>;
    fn claim_ticket(&self, claim: TicketClaim) -> BoxFuture<'static, StorageResult<ClaimOutcome>>;
    fn commit_winner(
        &self,
        commit: WinnerCommit,
    ) -> BoxFuture<'static, StorageResult<CommitOutcome>>;
    /// Delete every winner of the minigame, returning how many were removed.
    fn clear_winners(&self, minigame_id: Uuid) -> BoxFuture<'static, StorageResult<usize>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
