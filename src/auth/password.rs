// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Password hashing with Argon2id.
//!
//! Secrets are stored only as irreversible, per-record-salted digests in PHC
//! string format. Argon2id is a deliberately slow, memory-hard KDF, and
//! `verify_password` compares over the digest in constant time.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::AuthError;

/// Syntactically valid Argon2id digest that matches no password.
///
/// Verified against when the login identifier is unknown, so the unknown-email
/// and wrong-password failure paths cost the same.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hash a password with a freshly generated per-record salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::InternalError(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored PHC digest.
///
/// An unparseable digest counts as a mismatch rather than an error; the
/// caller only ever learns pass/fail.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Burn the same work as a real verification without a real record.
pub fn dummy_verify(password: &str) {
    let _ = verify_password(password, DUMMY_HASH);
}
