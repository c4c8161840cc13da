use thiserror::Error;
use uuid::Uuid;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying engine.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A minigame record exists without its ticket ledger.
    #[error("ledger missing for minigame `{0}`")]
    MissingLedger(Uuid),
}
