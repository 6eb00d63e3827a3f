// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! JWT claims and the authenticated-user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried inside a session token.
///
/// The token is the entire session: nothing is stored server-side, so
/// validity is determined purely by the signature and `exp` at verification
/// time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the identity record id.
    pub sub: String,

    /// Wallet address, present only for wallet-scheme sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,

    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,

    /// Expiration (Unix timestamp, seconds, exclusive).
    pub exp: i64,
}

/// Authenticated user information extracted from a verified token.
///
/// This is the type handlers see once the token verifier has admitted a
/// request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Identity record id (the token `sub` claim).
    pub user_id: String,

    /// Wallet address bound to the session, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,

    /// Token expiration (Unix timestamp, used for logging, not serialized).
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Create from verified claims.
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            wallet_address: claims.wallet,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_claims_extracts_subject_and_wallet() {
        let claims = Claims {
            sub: "user-1".to_string(),
            wallet: Some("0xabc".to_string()),
            iat: 1700000000,
            exp: 1700003600,
        };

        let user = AuthenticatedUser::from_claims(claims);
        assert_eq!(user.user_id, "user-1");
        assert_eq!(user.wallet_address.as_deref(), Some("0xabc"));
        assert_eq!(user.expires_at, 1700003600);
    }

    #[test]
    fn wallet_claim_is_omitted_when_absent() {
        let claims = Claims {
            sub: "user-1".to_string(),
            wallet: None,
            iat: 0,
            exp: 1,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("wallet"));
    }
}
