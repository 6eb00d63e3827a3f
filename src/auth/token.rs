// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a symmetric, process-wide secret. The
//! secret must be identical across every process instance that issues or
//! verifies tokens and is never exposed to clients. Both operations are pure
//! computations over the read-only keys, so they run with unbounded
//! concurrency.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{AuthError, AuthenticatedUser, Claims};

/// Default validity window: 1 hour.
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Issues and verifies signed session tokens.
///
/// Algorithm and validity window are fixed per deployment; both sides of the
/// token lifecycle share this one type so they can never disagree on either.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Build from the deployment secret and validity window (seconds).
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    /// The configured validity window in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Mint a signed token binding `subject_id` to a validity window starting
    /// now.
    pub fn issue(&self, subject_id: &str, wallet_address: Option<&str>) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject_id.to_string(),
            wallet: wallet_address.map(str::to_string),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(format!("token signing failed: {e}")))
    }

    /// Verify signature and expiry, then decode the bound identity.
    ///
    /// `exp` is exclusive: a token presented exactly at its expiration
    /// instant is rejected.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })?;

        let claims = token_data.claims;

        // The library treats exp == now as still valid; the window here is
        // exclusive at its upper bound.
        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(AuthenticatedUser::from_claims(claims))
    }
}
