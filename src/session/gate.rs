// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Session gate and local artifact store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

/// Well-known key for the persisted session token (password scheme).
pub const TOKEN_KEY: &str = "token";

/// Well-known key for the persisted wallet address (wallet scheme).
pub const WALLET_KEY: &str = "walletAddress";

/// Which session artifact this build gates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionScheme {
    /// Gate on the bearer token written by password login.
    Token,
    /// Gate on the wallet address written by wallet login.
    Wallet,
}

impl SessionScheme {
    /// The local-store key holding this scheme's artifact.
    pub fn artifact_key(self) -> &'static str {
        match self {
            SessionScheme::Token => TOKEN_KEY,
            SessionScheme::Wallet => WALLET_KEY,
        }
    }
}

/// Outcome of a gate evaluation for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// A plausible session artifact is present; render protected content.
    Allow,
    /// No artifact; send the caller to the login entry point, remembering
    /// where they wanted to go.
    RedirectToLogin {
        /// The originally requested location, for post-login return.
        return_to: String,
    },
}

/// Local key-value persistence for session artifacts.
///
/// The real frontend backs this with browser localStorage; tests use
/// [`MemorySessionStore`]. Every mutation bumps the change channel so gates
/// in other tabs re-evaluate without a reload.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    /// Receiver notified after every mutation (the storage-event analogue).
    fn changes(&self) -> watch::Receiver<u64>;
}

/// In-memory [`SessionStore`].
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
    version: watch::Sender<u64>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            values: Mutex::new(HashMap::new()),
            version,
        }
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().expect("session store lock").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .expect("session store lock")
            .insert(key.to_string(), value.to_string());
        self.bump();
    }

    fn remove(&self, key: &str) {
        self.values.lock().expect("session store lock").remove(key);
        self.bump();
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

/// Client-side guard deciding, per navigation, whether the caller holds a
/// plausible session artifact.
///
/// Not a security boundary - the token verifier on the server is. The gate
/// only mirrors admission for UI routing, so it must be cheap to re-run on
/// every navigation and on every store-change notification.
pub struct SessionGate<S: SessionStore> {
    store: Arc<S>,
    scheme: SessionScheme,
    login_path: String,
}

impl<S: SessionStore> SessionGate<S> {
    pub fn new(store: Arc<S>, scheme: SessionScheme) -> Self {
        Self {
            store,
            scheme,
            login_path: "/login".to_string(),
        }
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Whether a non-empty session artifact is currently persisted.
    pub fn is_authenticated(&self) -> bool {
        self.store
            .get(self.scheme.artifact_key())
            .is_some_and(|value| !value.trim().is_empty())
    }

    /// Decide admission for a navigation to `requested_path`.
    pub fn evaluate(&self, requested_path: &str) -> GateDecision {
        if self.is_authenticated() {
            GateDecision::Allow
        } else {
            GateDecision::RedirectToLogin {
                return_to: requested_path.to_string(),
            }
        }
    }

    /// The login entry point redirects target.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Persist the artifact written by a successful login.
    pub fn store_artifact(&self, value: &str) {
        self.store.set(self.scheme.artifact_key(), value);
    }

    /// Clear every session artifact (logout).
    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(WALLET_KEY);
    }

    /// Decoration for outgoing requests: `Bearer <token>` when a token is
    /// persisted.
    pub fn authorization_header(&self) -> Option<String> {
        self.store
            .get(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
            .map(|token| format!("Bearer {token}"))
    }

    /// Subscribe to store-change notifications; the caller re-evaluates on
    /// every tick (cross-tab logout/login without a reload).
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.store.changes()
    }
}
