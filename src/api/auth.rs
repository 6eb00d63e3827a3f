// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Credential verification endpoints.
//!
//! Two independent schemes share these routes but never a record shape:
//! email/password (register + login) and wallet address (single idempotent
//! login-or-create). Both delegate to the token issuer on success.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::password,
    error::ApiError,
    models::{
        LoginRequest, RegisterRequest, TokenResponse, WalletLoginRequest, WalletLoginResponse,
    },
    state::AppState,
    storage::StoredUser,
};

/// Register a new email/password identity.
///
/// The password is stored only as a salted Argon2id digest. Both the
/// display name and the email must be unused.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Missing field or identifier already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let username = request.username.trim();
    let email = request.email.trim();

    if username.is_empty() {
        return Err(ApiError::missing_field("username"));
    }
    if email.is_empty() {
        return Err(ApiError::missing_field("email"));
    }
    if request.password.is_empty() {
        return Err(ApiError::missing_field("password"));
    }

    let password_hash = password::hash_password(&request.password)
        .map_err(|_| ApiError::server_error())?;

    let user = state
        .users
        .create_password_user(username, email, &password_hash)?;

    tracing::info!(user_id = %user.id(), "registered new account");

    let token = state
        .tokens
        .issue(user.id(), None)
        .map_err(|_| ApiError::server_error())?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Log in with email and password.
///
/// Unknown email and wrong password produce the same 400 response, and the
/// unknown-email path burns a dummy digest verification so the two failures
/// cost the same.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = request.email.trim();
    tracing::debug!(email = %email, "login attempt");

    let Some(user) = state.users.find_by_email(email)? else {
        password::dummy_verify(&request.password);
        return Err(ApiError::invalid_credentials());
    };

    // The email index only ever points at password-scheme records; burn the
    // dummy digest anyway so this path costs the same as the others.
    let StoredUser::Password { password_hash, .. } = &user else {
        password::dummy_verify(&request.password);
        return Err(ApiError::invalid_credentials());
    };

    if !password::verify_password(&request.password, password_hash) {
        return Err(ApiError::invalid_credentials());
    }

    let token = state
        .tokens
        .issue(user.id(), None)
        .map_err(|_| ApiError::server_error())?;

    Ok(Json(TokenResponse { token }))
}

/// Log in with a wallet address, creating the account on first use.
///
/// Possession of the address is asserted entirely by the client-side wallet
/// tool; this endpoint performs no proof-of-possession challenge. Idempotent
/// by address: repeated calls never create a second record.
#[utoipa::path(
    post,
    path = "/v1/auth/wallet-login",
    request_body = WalletLoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Login successful (account created on first use)", body = WalletLoginResponse),
        (status = 400, description = "Missing wallet address, or username absent for a new address"),
    )
)]
pub async fn wallet_login(
    State(state): State<AppState>,
    Json(request): Json<WalletLoginRequest>,
) -> Result<Json<WalletLoginResponse>, ApiError> {
    if request.wallet_address.is_empty() {
        return Err(ApiError::missing_field("walletAddress"));
    }
    let address = request.wallet_address.normalized();

    let username = request
        .username
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let outcome = match username {
        Some(name) => state.users.create_or_get_wallet_user(&address, name)?,
        None => {
            // Without a username only an existing record can log in.
            match state.users.find_by_wallet(&address)? {
                Some(user) => crate::storage::WalletLogin {
                    user,
                    created: false,
                },
                None => return Err(ApiError::missing_field("username")),
            }
        }
    };

    if outcome.created {
        tracing::info!(user_id = %outcome.user.id(), "created wallet account");
    }

    let token = state
        .tokens
        .issue(outcome.user.id(), Some(&address))
        .map_err(|_| ApiError::server_error())?;

    let message = if outcome.created {
        "Account created."
    } else {
        "Login successful."
    };

    Ok(Json(WalletLoginResponse {
        token,
        message: message.to_string(),
    }))
}
