// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Propgate - Identity & Session Service
//!
//! This crate authenticates users by two alternate credential schemes
//! (email/password and wallet address), issues signed stateless bearer
//! tokens, and verifies them on protected routes. The `session` module holds
//! the client-side gating logic shared with the web frontend.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Credential verification, token issuance and verification
//! - `config` - Environment-driven runtime configuration
//! - `session` - Client-side session gate
//! - `storage` - Embedded user store (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod state;
pub mod storage;
