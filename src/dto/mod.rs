//! Wire types shared by the REST service and the client.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod draw;
pub mod health;
pub mod minigame;
pub mod ticket;
pub mod user;
pub mod validation;

/// Body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
