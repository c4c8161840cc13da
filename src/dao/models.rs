use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Minigame definition as persisted by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MinigameEntity {
    /// Stable identifier for the minigame.
    pub id: Uuid,
    /// Human readable minigame name.
    pub name: String,
    /// Contest the minigame belongs to.
    pub contest_id: String,
    /// Opening instant of the registration window.
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// Closing instant of the registration window.
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    /// Highest number on the grid (numbers run from 1 to this value).
    pub max_number: u32,
    /// Maximum number of winners that can be committed.
    pub max_winners: u32,
    /// Admin switch; a switched-off minigame never accepts tickets.
    pub is_active: bool,
}

impl MinigameEntity {
    /// True when the admin switch is on and `now` falls inside the window (bounds included).
    pub fn is_open_at(&self, now: OffsetDateTime) -> bool {
        self.is_active && self.start_time <= now && now <= self.end_time
    }

    /// True when `number` is a cell of this minigame's grid.
    pub fn contains_number(&self, number: u32) -> bool {
        (1..=self.max_number).contains(&number)
    }
}

/// A user's claim on one number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketEntity {
    pub id: Uuid,
    pub minigame_id: Uuid,
    pub user_id: String,
    pub number: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A committed draw result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinnerEntity {
    pub id: Uuid,
    pub minigame_id: Uuid,
    pub ticket_number: u32,
    pub user_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub drawn_at: OffsetDateTime,
}

/// Tickets and winners of a single minigame, read in one consistent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Tickets keyed by number, in claim order.
    pub tickets: IndexMap<u32, TicketEntity>,
    /// Winners in draw order.
    pub winners: Vec<WinnerEntity>,
}

impl LedgerSnapshot {
    /// Tickets that have not won yet and can still be drawn.
    pub fn eligible_tickets(&self) -> Vec<&TicketEntity> {
        self.tickets
            .values()
            .filter(|ticket| {
                self.winners
                    .iter()
                    .all(|winner| winner.ticket_number != ticket.number)
            })
            .collect()
    }
}

/// Request to claim `number` for `user_id`.
#[derive(Debug, Clone)]
pub struct TicketClaim {
    pub minigame_id: Uuid,
    pub user_id: String,
    pub number: u32,
    pub claimed_at: OffsetDateTime,
}

/// Result of a ticket claim, decided atomically by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The ticket was created.
    Claimed(TicketEntity),
    /// Another user already holds this number.
    NumberTaken,
    /// The user already holds a ticket in this minigame.
    AlreadyHolding(TicketEntity),
    /// No ledger exists for the minigame.
    UnknownMinigame,
}

/// Request to commit the ticket holding `ticket_number` as a winner.
#[derive(Debug, Clone)]
pub struct WinnerCommit {
    pub minigame_id: Uuid,
    pub ticket_number: u32,
    pub max_winners: u32,
    pub drawn_at: OffsetDateTime,
}

/// Result of a winner commit, decided atomically by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The winner was recorded.
    Committed(WinnerEntity),
    /// `max_winners` winners are already recorded.
    CapReached,
    /// The ticket already won.
    AlreadyWinner,
    /// No ticket holds this number.
    UnknownTicket,
    /// No ledger exists for the minigame.
    UnknownMinigame,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn minigame() -> MinigameEntity {
        MinigameEntity {
            id: Uuid::new_v4(),
            name: "Lucky".into(),
            contest_id: "contest-1".into(),
            start_time: datetime!(2026-10-01 08:00 UTC),
            end_time: datetime!(2026-10-01 18:00 UTC),
            max_number: 20,
            max_winners: 2,
            is_active: true,
        }
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let game = minigame();
        assert!(game.is_open_at(datetime!(2026-10-01 08:00 UTC)));
        assert!(game.is_open_at(datetime!(2026-10-01 18:00 UTC)));
        assert!(!game.is_open_at(datetime!(2026-10-01 07:59:59 UTC)));
        assert!(!game.is_open_at(datetime!(2026-10-01 18:00:01 UTC)));
    }

    #[test]
    fn switched_off_minigame_is_closed() {
        let mut game = minigame();
        game.is_active = false;
        assert!(!game.is_open_at(datetime!(2026-10-01 12:00 UTC)));
    }

    #[test]
    fn winners_are_not_eligible() {
        let minigame_id = Uuid::new_v4();
        let at = datetime!(2026-10-01 12:00 UTC);
        let mut snapshot = LedgerSnapshot::default();
        for (number, user) in [(3, "a"), (9, "b")] {
            snapshot.tickets.insert(
                number,
                TicketEntity {
                    id: Uuid::new_v4(),
                    minigame_id,
                    user_id: user.into(),
                    number,
                    created_at: at,
                },
            );
        }
        snapshot.winners.push(WinnerEntity {
            id: Uuid::new_v4(),
            minigame_id,
            ticket_number: 3,
            user_id: "a".into(),
            drawn_at: at,
        });

        let eligible: Vec<u32> = snapshot
            .eligible_tickets()
            .into_iter()
            .map(|ticket| ticket.number)
            .collect();
        assert_eq!(eligible, vec![9]);
    }
}
