// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Durable identity records.
//!
//! The two credential schemes use structurally different record shapes, so
//! they are modeled as a tagged enum rather than one loose struct with
//! optional fields. A password record never has a wallet address and a wallet
//! record never has a password digest; each verifier only ever sees fields it
//! can validate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One registered identity, under exactly one credential scheme.
///
/// Serialized as JSON with a `scheme` discriminator so records written under
/// one scheme can never be misread as the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum StoredUser {
    /// Email/password identity. The password is stored only as an Argon2id
    /// PHC string, never as recoverable plaintext.
    Password {
        /// Server-generated UUID, immutable once assigned.
        id: String,
        /// Display name, unique across all records.
        username: String,
        /// Login identifier, unique across all records. Lowercased on write.
        email: String,
        /// Argon2id digest in PHC string format (includes per-record salt).
        password_hash: String,
        /// When the record was created.
        created_at: DateTime<Utc>,
    },
    /// Wallet-address identity. No secret is stored; possession of the
    /// address is asserted by the client-side wallet tool.
    Wallet {
        /// Server-generated UUID, immutable once assigned.
        id: String,
        /// Display name, unique across all records.
        username: String,
        /// Login identifier, unique across all records. Lowercased on write.
        wallet_address: String,
        /// When the record was created.
        created_at: DateTime<Utc>,
    },
}

impl StoredUser {
    /// Build a new password-scheme record with a fresh id.
    pub fn new_password(username: &str, email: &str, password_hash: &str) -> Self {
        StoredUser::Password {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_lowercase(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Build a new wallet-scheme record with a fresh id.
    pub fn new_wallet(username: &str, wallet_address: &str) -> Self {
        StoredUser::Wallet {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            wallet_address: wallet_address.to_lowercase(),
            created_at: Utc::now(),
        }
    }

    /// The stable record id.
    pub fn id(&self) -> &str {
        match self {
            StoredUser::Password { id, .. } | StoredUser::Wallet { id, .. } => id,
        }
    }

    /// The display name.
    pub fn username(&self) -> &str {
        match self {
            StoredUser::Password { username, .. } | StoredUser::Wallet { username, .. } => username,
        }
    }

    /// The wallet address, if this is a wallet-scheme record.
    pub fn wallet_address(&self) -> Option<&str> {
        match self {
            StoredUser::Wallet { wallet_address, .. } => Some(wallet_address),
            StoredUser::Password { .. } => None,
        }
    }
}
