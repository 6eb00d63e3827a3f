// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::storage::UserStore;

/// Shared application state.
///
/// Both members are read-only after startup as far as Rust is concerned:
/// the token keys never change, and the user store serializes its own write
/// transactions internally. No locks are held across requests.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(users: UserStore, tokens: TokenIssuer) -> Self {
        Self {
            users: Arc::new(users),
            tokens: Arc::new(tokens),
        }
    }
}
