//! Ticket registry payloads.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::TicketEntity;

/// A user's claim on one number.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    pub id: Uuid,
    pub minigame_id: Uuid,
    pub user_id: String,
    pub number: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<TicketEntity> for TicketDto {
    fn from(entity: TicketEntity) -> Self {
        Self {
            id: entity.id,
            minigame_id: entity.minigame_id,
            user_id: entity.user_id,
            number: entity.number,
            created_at: entity.created_at,
        }
    }
}

/// Occupancy figures computed on every registry read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatsDto {
    /// Taken numbers in ascending order.
    pub taken_numbers: Vec<u32>,
    pub taken_tickets: u32,
    pub available_tickets: u32,
}

impl TicketStatsDto {
    /// Compute the stats of a grid of `max_number` cells with the given numbers taken.
    pub fn compute(max_number: u32, taken: impl IntoIterator<Item = u32>) -> Self {
        let mut taken_numbers: Vec<u32> = taken
            .into_iter()
            .filter(|number| (1..=max_number).contains(number))
            .collect();
        taken_numbers.sort_unstable();
        taken_numbers.dedup();

        let taken_tickets = taken_numbers.len() as u32;
        Self {
            taken_numbers,
            taken_tickets,
            available_tickets: max_number.saturating_sub(taken_tickets),
        }
    }
}

/// Response of `GET /minigames/{id}/tickets`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TicketsResponse {
    pub tickets: Vec<TicketDto>,
    pub ticket_stats: TicketStatsDto,
    /// Tickets held by the caller.
    pub user_tickets: Vec<TicketDto>,
}

/// Request to claim a number.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectTicketRequest {
    pub number: u32,
}
