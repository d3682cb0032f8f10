use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use miniblog_common::PrincipalId;

use crate::{error::AppError, AppState};

/// Principal attached to a request by [`require_auth`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub PrincipalId);

/// Reject the request unless it carries a valid bearer token
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = match request.headers().get(AUTHORIZATION) {
        None => return Err(AppError::MissingHeader),
        Some(value) => value.to_str().map_err(|_| AppError::MalformedHeader)?,
    };
    if header.is_empty() {
        return Err(AppError::MissingHeader);
    }

    let principal = state.auth.authenticate_request(header)?;
    request.extensions_mut().insert(CurrentUser(principal));

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or(AppError::MissingHeader)
    }
}
