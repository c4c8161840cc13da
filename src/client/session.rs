//! Session context: the identity-provider token and the cached profile, with the clock
//! and the storage injected so staleness and refresh rules run without real timers.

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::{
    client::{
        TokenProvider,
        error::{ClientError, ClientResult},
    },
    clock::Clock,
    dto::user::UserProfile,
};

/// Storage key of the serialized [`IdToken`].
pub const TOKEN_KEY: &str = "lucky_draw.session.token";
/// Storage key of the serialized [`CachedProfile`].
pub const PROFILE_KEY: &str = "lucky_draw.session.profile";
/// Age after which the cached profile should be fetched again.
pub const DEFAULT_PROFILE_MAX_AGE: Duration = Duration::minutes(5);
/// Tokens expiring within this margin are refreshed ahead of time.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::minutes(5);

/// Key-value persistence for the session, e.g. browser local storage.
pub trait SessionStorage: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// Process-local [`SessionStorage`].
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: DashMap<String, String>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn store(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// ID token issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IdToken {
    pub value: String,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl IdToken {
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

/// Profile snapshot together with the instant it was cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CachedProfile {
    pub profile: UserProfile,
    #[serde(with = "time::serde::rfc3339")]
    pub cached_at: OffsetDateTime,
}

/// Exchanges a token that is about to expire for a fresh one.
pub trait TokenRefresher: Send + Sync {
    fn refresh<'a>(&'a self, current: &'a IdToken) -> BoxFuture<'a, ClientResult<IdToken>>;
}

#[derive(Debug, Default)]
struct SessionData {
    token: Option<IdToken>,
    profile: Option<CachedProfile>,
}

/// Explicit session object handed to the client and the views.
pub struct SessionContext {
    clock: Arc<dyn Clock>,
    storage: Arc<dyn SessionStorage>,
    data: RwLock<SessionData>,
    profile_max_age: Duration,
    refresh_margin: Duration,
}

impl SessionContext {
    pub fn new(clock: Arc<dyn Clock>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            clock,
            storage,
            data: RwLock::new(SessionData::default()),
            profile_max_age: DEFAULT_PROFILE_MAX_AGE,
            refresh_margin: DEFAULT_REFRESH_MARGIN,
        }
    }

    pub fn with_profile_max_age(mut self, max_age: Duration) -> Self {
        self.profile_max_age = max_age;
        self
    }

    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// Store a freshly signed-in session in memory and in storage.
    pub fn establish(&self, token: IdToken, profile: UserProfile) {
        let cached = CachedProfile {
            profile,
            cached_at: self.clock.now(),
        };
        self.persist(TOKEN_KEY, &token);
        self.persist(PROFILE_KEY, &cached);

        info!(user_id = %cached.profile.id, "session established");
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.token = Some(token);
        data.profile = Some(cached);
    }

    /// Reload the session from storage. Entries that do not parse are removed.
    /// Returns true when a token was restored.
    pub fn restore(&self) -> bool {
        let token = self.load::<IdToken>(TOKEN_KEY);
        let profile = self.load::<CachedProfile>(PROFILE_KEY);
        let restored = token.is_some();

        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.token = token;
        data.profile = profile;
        restored
    }

    /// Replace the cached profile after it was fetched again.
    pub fn update_profile(&self, profile: UserProfile) {
        let cached = CachedProfile {
            profile,
            cached_at: self.clock.now(),
        };
        self.persist(PROFILE_KEY, &cached);
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .profile = Some(cached);
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .profile
            .as_ref()
            .map(|cached| cached.profile.clone())
    }

    /// True when no profile is cached or the cached one is older than the allowed age.
    pub fn profile_is_stale(&self) -> bool {
        let now = self.clock.now();
        match &self.data.read().unwrap_or_else(PoisonError::into_inner).profile {
            Some(cached) => now - cached.cached_at > self.profile_max_age,
            None => true,
        }
    }

    /// True when a token exists and expires within the refresh margin.
    pub fn token_needs_refresh(&self) -> bool {
        let now = self.clock.now();
        match &self.data.read().unwrap_or_else(PoisonError::into_inner).token {
            Some(token) => token.expires_at - self.refresh_margin <= now,
            None => false,
        }
    }

    /// Refresh the token through `refresher` when it is due. Returns true when replaced.
    pub async fn refresh_if_due(&self, refresher: &dyn TokenRefresher) -> ClientResult<bool> {
        if !self.token_needs_refresh() {
            return Ok(false);
        }
        let current = self
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
            .ok_or(ClientError::Unauthorized)?;

        let fresh = match refresher.refresh(&current).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                return Err(err);
            }
        };

        debug!(expires_at = %fresh.expires_at, "token refreshed");
        self.persist(TOKEN_KEY, &fresh);
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .token = Some(fresh);
        Ok(true)
    }

    /// Forget the session in memory and in storage.
    pub fn sign_out(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(PROFILE_KEY);
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = SessionData::default();
        info!("signed out");
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.storage.store(key, json),
            Err(err) => warn!(key, error = %err, "failed to serialize session entry"),
        }
    }

    fn load<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let raw = self.storage.load(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable session entry");
                self.storage.remove(key);
                None
            }
        }
    }
}

impl TokenProvider for SessionContext {
    fn bearer_token(&self) -> Option<String> {
        let now = self.clock.now();
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .as_ref()
            .filter(|token| !token.is_expired_at(now))
            .map(|token| token.value.clone())
    }
}
