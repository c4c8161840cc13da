//! Draw protocol payloads: preview (`confirm = false`) and commit (`confirm = true`).

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dao::models::WinnerEntity, dto::user::UserSummary};

/// Request body of `POST /minigames/{id}/draw`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub confirm: bool,
    /// Number shown by a previous preview. When absent on confirm, a new ticket is picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_number: Option<u32>,
}

impl DrawRequest {
    pub fn preview() -> Self {
        Self {
            confirm: false,
            ticket_number: None,
        }
    }

    pub fn confirm(ticket_number: Option<u32>) -> Self {
        Self {
            confirm: true,
            ticket_number,
        }
    }
}

/// Uncommitted draw result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PotentialWinnerDto {
    pub ticket_id: Uuid,
    pub number: u32,
    pub user: UserSummary,
}

/// Committed draw result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WinnerDto {
    pub id: Uuid,
    pub minigame_id: Uuid,
    pub ticket_number: u32,
    pub user_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub drawn_at: OffsetDateTime,
}

impl From<WinnerEntity> for WinnerDto {
    fn from(entity: WinnerEntity) -> Self {
        Self {
            id: entity.id,
            minigame_id: entity.minigame_id,
            ticket_number: entity.ticket_number,
            user_id: entity.user_id,
            drawn_at: entity.drawn_at,
        }
    }
}

/// Response of `POST /minigames/{id}/draw`; exactly one field is set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DrawResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_winner: Option<PotentialWinnerDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<WinnerDto>,
}
