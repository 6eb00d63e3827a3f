// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! # API Data Models
//!
//! Request and response structures for the authentication endpoints. All
//! types derive `Serialize`/`Deserialize` and `ToSchema` for JSON handling
//! and OpenAPI documentation.
//!
//! Request fields use camelCase on the wire (`walletAddress`), matching what
//! the web frontend sends.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Wallet address wrapper.
///
/// The address is an opaque, client-asserted identifier; no particular shape
/// is enforced. It is only ever compared in its lowercase form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Canonical lowercase form used for storage lookups and token claims.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Whether the address is non-empty after trimming.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Body for `POST /v1/auth/register`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name, unique across all users.
    pub username: String,
    /// Login email, unique across all users.
    pub email: String,
    /// Plaintext password; hashed before storage, never persisted as-is.
    pub password: String,
}

/// Body for `POST /v1/auth/login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /v1/auth/wallet-login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletLoginRequest {
    /// The wallet address asserted by the client wallet tool.
    pub wallet_address: WalletAddress,
    /// Display name; required only on first login for a new address.
    #[serde(default)]
    pub username: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// Successful registration or login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed session token; send as `Authorization: Bearer <token>`.
    pub token: String,
}

/// Successful wallet login, which may have created the account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WalletLoginResponse {
    /// Signed session token.
    pub token: String,
    /// "Account created." on first login, "Login successful." afterwards.
    pub message: String,
}
