//! Request extractors with project-specific rejections.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejection renders as a `BAD_REQUEST` [`AppError`]
/// instead of axum's plain-text default.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
