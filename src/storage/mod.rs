// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! # User Storage Module
//!
//! Durable identity records live in an embedded redb database. The store is
//! the single authoritative copy of every record; nothing about a session is
//! persisted here (sessions are stateless bearer tokens).
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/users.redb
//!   users            # id → JSON StoredUser
//!   username_index   # display name → id
//!   email_index      # email → id
//!   wallet_index     # wallet address → id
//! ```
//!
//! Uniqueness constraints are enforced at the store level, inside one write
//! transaction per mutation. There are no update or delete operations.

pub mod database;
pub mod users;

pub use database::{StoreError, StoreResult, UserStore, WalletLogin};
pub use users::StoredUser;
