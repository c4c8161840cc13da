use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejections render as `{ "error": ... }` 400 responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
