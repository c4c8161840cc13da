use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{error::AppError, state::SharedState};

/// Resolve the bearer token and attach the caller as an [`AuthUser`](crate::state::AuthUser)
/// request extension.
pub async fn require_user(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let user = state.users().authenticate(header).map_err(|err| {
        debug!(error = %err, path = %req.uri().path(), "rejected request");
        AppError::from(err)
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
