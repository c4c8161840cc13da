pub mod auth;

use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    dao::minigame_store::MinigameStore,
};

pub use self::auth::{AuthUser, UserRegistry};

pub type SharedState = Arc<AppState>;

/// Central application state: the minigame store, the accounts allowed in and the clock.
pub struct AppState {
    store: Arc<dyn MinigameStore>,
    users: UserRegistry,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        store: Arc<dyn MinigameStore>,
        users: UserRegistry,
        clock: Arc<dyn Clock>,
    ) -> SharedState {
        Arc::new(Self {
            store,
            users,
            clock,
        })
    }

    /// Same as [`AppState::new`] with the wall clock.
    pub fn with_system_clock(store: Arc<dyn MinigameStore>, users: UserRegistry) -> SharedState {
        Self::new(store, users, Arc::new(SystemClock))
    }

    /// Handle to the minigame store.
    pub fn store(&self) -> Arc<dyn MinigameStore> {
        self.store.clone()
    }

    /// Accounts resolvable from a bearer token.
    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    /// Current instant according to the injected clock.
    pub fn now(&self) -> time::OffsetDateTime {
        self.clock.now()
    }
}
