// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Token verification middleware.
//!
//! Applied to the protected router subtree with
//! `axum::middleware::from_fn_with_state(state, require_auth)`. Each request
//! walks a short admission sequence: extract the bearer token from the
//! `Authorization` header, verify signature, verify expiry, decode the
//! subject. Any failure short-circuits with 401 and nothing is attached to
//! the request; there is no partial admission.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthenticatedUser, AuthError};
use crate::state::AppState;

/// Reject the request unless it carries a valid session token.
///
/// On success the verified [`AuthenticatedUser`] is inserted into the request
/// extensions for downstream handlers and extractors.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Extract Authorization header
    let auth_header = match request.headers().get(AUTHORIZATION) {
        Some(header) => header,
        None => return AuthError::MissingAuthHeader.into_response(),
    };

    // Parse Bearer token
    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(_) => return AuthError::InvalidAuthHeader.into_response(),
    };

    let token = match auth_str.strip_prefix("Bearer ") {
        Some(t) => t.trim(),
        None => return AuthError::InvalidAuthHeader.into_response(),
    };

    // Validate token and attach the identity
    match state.tokens.verify(token) {
        Ok(user) => {
            request.extensions_mut().insert::<AuthenticatedUser>(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
