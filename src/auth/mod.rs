// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! # Authentication Module
//!
//! Credential verification and the stateless session machinery.
//!
//! ## Session Flow
//!
//! 1. Client authenticates via `/v1/auth/register`, `/v1/auth/login`, or
//!    `/v1/auth/wallet-login`
//! 2. Server mints an HS256 JWT binding the record id to a validity window
//! 3. Client sends `Authorization: Bearer <token>` on protected routes
//! 4. Server verifies signature and expiry, then attaches the identity to
//!    the request - no server-side session lookup of any kind
//!
//! ## Security
//!
//! - Passwords are stored only as salted Argon2id digests
//! - Digest comparison is constant-time; unknown identifiers burn the same
//!   verification work as wrong passwords
//! - The signing secret is read-only process configuration, never sent to
//!   clients
//! - Expiry is exclusive: a token presented exactly at `exp` is rejected

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_auth;
pub use token::{TokenIssuer, DEFAULT_TTL_SECS};
