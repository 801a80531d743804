//! Request authentication and the write permission guard.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use bookshelf_authz::{authenticated_or_read_only, AuthError, Decision, TokenAuthenticator};

use crate::error::AppError;

/// Authenticates the caller and rejects anonymous writes.
///
/// A valid principal is stored in the request extensions for handlers.
/// Present but invalid credentials fail with 401 even on reads.
pub async fn write_guard(
    State(authenticator): State<TokenAuthenticator>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
        None => None,
    };
    let principal = authenticator.authenticate(header)?;

    if authenticated_or_read_only(req.method().as_str(), principal.as_ref()) == Decision::Deny {
        tracing::warn!(
            method = %req.method(),
            uri = %req.uri(),
            "anonymous write rejected"
        );
        return Err(AppError::forbidden(
            "Authentication credentials were not provided.",
        ));
    }

    if let Some(principal) = principal {
        tracing::debug!(user = %principal.username, "request authenticated");
        req.extensions_mut().insert(principal);
    }

    Ok(next.run(req).await)
}
