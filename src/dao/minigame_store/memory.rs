use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    minigame_store::MinigameStore,
    models::{
        ClaimOutcome, CommitOutcome, LedgerSnapshot, MinigameEntity, TicketClaim, TicketEntity,
        WinnerCommit, WinnerEntity,
    },
    storage::{StorageError, StorageResult},
};

/// Process-local store. Each minigame's ledger is one `DashMap` entry and every
/// check-then-write runs while that entry's shard lock is held.
#[derive(Clone, Default)]
pub struct InMemoryMinigameStore {
    minigames: Arc<DashMap<Uuid, MinigameEntity>>,
    ledgers: Arc<DashMap<Uuid, LedgerSnapshot>>,
}

impl InMemoryMinigameStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim(&self, claim: TicketClaim) -> ClaimOutcome {
        let Some(mut ledger) = self.ledgers.get_mut(&claim.minigame_id) else {
            return ClaimOutcome::UnknownMinigame;
        };

        if ledger.tickets.contains_key(&claim.number) {
            return ClaimOutcome::NumberTaken;
        }
        if let Some(existing) = ledger
            .tickets
            .values()
            .find(|ticket| ticket.user_id == claim.user_id)
        {
            return ClaimOutcome::AlreadyHolding(existing.clone());
        }

        let ticket = TicketEntity {
            id: Uuid::new_v4(),
            minigame_id: claim.minigame_id,
            user_id: claim.user_id,
            number: claim.number,
            created_at: claim.claimed_at,
        };
        ledger.tickets.insert(ticket.number, ticket.clone());
        ClaimOutcome::Claimed(ticket)
    }

    fn commit(&self, commit: WinnerCommit) -> CommitOutcome {
        let Some(mut ledger) = self.ledgers.get_mut(&commit.minigame_id) else {
            return CommitOutcome::UnknownMinigame;
        };

        if ledger.winners.len() >= commit.max_winners as usize {
            return CommitOutcome::CapReached;
        }
        let Some(ticket) = ledger.tickets.get(&commit.ticket_number) else {
            return CommitOutcome::UnknownTicket;
        };
        if ledger
            .winners
            .iter()
            .any(|winner| winner.ticket_number == commit.ticket_number)
        {
            return CommitOutcome::AlreadyWinner;
        }

        let winner = WinnerEntity {
            id: Uuid::new_v4(),
            minigame_id: commit.minigame_id,
            ticket_number: ticket.number,
            user_id: ticket.user_id.clone(),
            drawn_at: commit.drawn_at,
        };
        ledger.winners.push(winner.clone());
        CommitOutcome::Committed(winner)
    }
}

impl MinigameStore for InMemoryMinigameStore {
    fn save_minigame(&self, minigame: MinigameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.ledgers.entry(minigame.id).or_default();
            store.minigames.insert(minigame.id, minigame);
            Ok(())
        })
    }

    fn find_minigame(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MinigameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.minigames.get(&id).map(|entry| entry.value().clone())) })
    }

    fn list_minigames(&self) -> BoxFuture<'static, StorageResult<Vec<MinigameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut minigames: Vec<MinigameEntity> = store
                .minigames
                .iter()
                .map(|entry| entry.value().clone())
                .collect();
            minigames.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.name.cmp(&b.name)));
            Ok(minigames)
        })
    }

    fn ledger(&self, minigame_id: Uuid) -> BoxFuture<'static, StorageResult<LedgerSnapshot>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .ledgers
                .get(&minigame_id)
                .map(|entry| entry.value().clone())
                .ok_or(StorageError::MissingLedger(minigame_id))
        })
    }

    fn claim_ticket(&self, claim: TicketClaim) -> BoxFuture<'static, StorageResult<ClaimOutcome>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.claim(claim)) })
    }

    fn commit_winner(
        &self,
        commit: WinnerCommit,
    ) -> BoxFuture<'static, StorageResult<CommitOutcome>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.commit(commit)) })
    }

    fn clear_winners(&self, minigame_id: Uuid) -> BoxFuture<'static, StorageResult<usize>> {
        let store = self.clone();
        Box::pin(async move {
            let mut ledger = store
                .ledgers
                .get_mut(&minigame_id)
                .ok_or(StorageError::MissingLedger(minigame_id))?;
            let cleared = ledger.winners.len();
            ledger.winners.clear();
            Ok(cleared)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
