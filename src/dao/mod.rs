/// Minigame persistence and the ledger of tickets and winners.
pub mod minigame_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
