//! HTTP client for the minigame service and the client-side plumbing around it.

pub mod error;
pub mod scope;
pub mod session;
pub mod toast;

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use uuid::Uuid;

use crate::dto::{
    ErrorBody,
    draw::{DrawRequest, DrawResponse, WinnerDto},
    minigame::{CreateMinigameRequest, MinigameDto},
    ticket::{SelectTicketRequest, TicketDto, TicketsResponse},
};

pub use self::error::{ClientError, ClientResult, GENERIC_FAILURE_MESSAGE};

/// Environment variable holding the service base URL.
const API_URL_ENV: &str = "LUCKY_DRAW_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Runtime configuration describing where the minigame service lives.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Overall request timeout; `None` keeps reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read the base URL from `LUCKY_DRAW_API_URL`, defaulting to a local service.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }
}

/// Source of the bearer token attached to every request.
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` when signed out or expired.
    fn bearer_token(&self) -> Option<String>;
}

/// Fixed token, for service accounts and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Typed access to the minigame REST API. Cheap to clone.
#[derive(Clone)]
pub struct MinigameClient {
    client: Client,
    base_url: Arc<str>,
    tokens: Arc<dyn TokenProvider>,
}

impl MinigameClient {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| ClientError::Network {
            path: config.base_url.clone(),
            source,
        })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
            tokens,
        })
    }

    pub async fn list_minigames(&self) -> ClientResult<Vec<MinigameDto>> {
        self.call(Method::GET, "minigames", None::<&()>).await
    }

    pub async fn get_minigame(&self, id: Uuid) -> ClientResult<MinigameDto> {
        self.call(Method::GET, &format!("minigames/{id}"), None::<&()>)
            .await
    }

    pub async fn create_minigame(&self, request: &CreateMinigameRequest) -> ClientResult<MinigameDto> {
        self.call(Method::POST, "minigames", Some(request)).await
    }

    /// Ticket registry read: every ticket, the stats and the caller's own tickets.
    pub async fn fetch_tickets(&self, minigame_id: Uuid) -> ClientResult<TicketsResponse> {
        self.call(
            Method::GET,
            &format!("minigames/{minigame_id}/tickets"),
            None::<&()>,
        )
        .await
    }

    /// Claim `number` for the signed-in user.
    pub async fn select_ticket(&self, minigame_id: Uuid, number: u32) -> ClientResult<TicketDto> {
        self.call(
            Method::POST,
            &format!("minigames/{minigame_id}/tickets"),
            Some(&SelectTicketRequest { number }),
        )
        .await
    }

    /// Preview or commit a draw depending on `request.confirm`.
    pub async fn draw(&self, minigame_id: Uuid, request: &DrawRequest) -> ClientResult<DrawResponse> {
        self.call(
            Method::POST,
            &format!("minigames/{minigame_id}/draw"),
            Some(request),
        )
        .await
    }

    pub async fn fetch_winners(&self, minigame_id: Uuid) -> ClientResult<Vec<WinnerDto>> {
        self.call(
            Method::GET,
            &format!("minigames/{minigame_id}/winners"),
            None::<&()>,
        )
        .await
    }

    /// Delete every winner of the minigame.
    pub async fn reset_winners(&self, minigame_id: Uuid) -> ClientResult<()> {
        let path = format!("minigames/{minigame_id}/winners");
        let response = self.send(Method::DELETE, &path, None::<&()>).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(failure(&path, response).await)
        }
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client.request(method, url).bearer_auth(token)
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<Response>
    where
        B: ?Sized + Serialize,
    {
        let token = self.tokens.bearer_token().ok_or(ClientError::Unauthorized)?;
        let mut builder = self.request(method.clone(), path, &token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(%method, path, "calling minigame service");
        builder.send().await.map_err(|source| ClientError::Network {
            path: path.to_string(),
            source,
        })
    }

    async fn call<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: ?Sized + Serialize,
    {
        let response = self.send(method, path, body).await?;
        if !response.status().is_success() {
            return Err(failure(path, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Unexpected {
                path: path.to_string(),
                detail: source.to_string(),
            })
    }
}

/// Classify a non-2xx response, reading the `error` field when the body has one.
async fn failure(path: &str, response: Response) -> ClientError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .map(|body| body.error);

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        status if status.is_client_error() => ClientError::Rejected {
            path: path.to_string(),
            status,
            message,
        },
        status => ClientError::Unexpected {
            path: path.to_string(),
            detail: message.unwrap_or_else(|| status.to_string()),
        },
    }
}
