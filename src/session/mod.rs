// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! # Client Session Gate
//!
//! Frontend-side admission logic, compiled into the web client. The gate
//! decides per navigation whether a locally persisted session artifact exists
//! and redirects to the login entry point otherwise, remembering the
//! originally requested location.
//!
//! This is explicitly *not* a security boundary: the server-side token
//! verifier is. The gate only keeps UI routing consistent with what the
//! server would decide, including across tabs - it re-evaluates on every
//! navigation and on every store-change notification.

pub mod gate;

pub use gate::{
    GateDecision, MemorySessionStore, SessionGate, SessionScheme, SessionStore, TOKEN_KEY,
    WALLET_KEY,
};
