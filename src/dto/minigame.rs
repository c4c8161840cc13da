//! Minigame definitions as exposed over the REST API.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::MinigameEntity;
use crate::dto::validation::validate_minigame_window;

/// Public projection of a minigame.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MinigameDto {
    pub id: Uuid,
    pub name: String,
    pub contest_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub max_number: u32,
    pub max_winners: u32,
    pub is_active: bool,
}

impl MinigameDto {
    /// True when the minigame accepts tickets at `now`.
    pub fn is_open_at(&self, now: OffsetDateTime) -> bool {
        self.is_active && self.start_time <= now && now <= self.end_time
    }
}

impl From<MinigameEntity> for MinigameDto {
    fn from(entity: MinigameEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            contest_id: entity.contest_id,
            start_time: entity.start_time,
            end_time: entity.end_time,
            max_number: entity.max_number,
            max_winners: entity.max_winners,
            is_active: entity.is_active,
        }
    }
}

/// Payload used by admins to create a minigame.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_minigame_window"))]
pub struct CreateMinigameRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1))]
    pub contest_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    #[validate(range(min = 1, max = 10000))]
    pub max_number: u32,
    #[validate(range(min = 1))]
    pub max_winners: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CreateMinigameRequest {
    /// Build the persisted entity under a fresh identifier.
    pub fn into_entity(self) -> MinigameEntity {
        MinigameEntity {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            contest_id: self.contest_id,
            start_time: self.start_time,
            end_time: self.end_time,
            max_number: self.max_number,
            max_winners: self.max_winners,
            is_active: self.is_active,
        }
    }
}
