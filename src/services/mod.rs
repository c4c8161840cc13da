/// OpenAPI documentation generation.
pub mod documentation;
/// Draw preview/commit, winner listing and reset.
pub mod draw_service;
/// Health check service.
pub mod health_service;
/// Minigame creation and lookup.
pub mod minigame_service;
/// Ticket registry reads and number claims.
pub mod ticket_service;
