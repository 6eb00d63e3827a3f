// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! Propgate server entry point.
//!
//! Bootstraps the service:
//! 1. Load configuration from environment (exits if the signing secret is
//!    absent)
//! 2. Initialize tracing
//! 3. Open the user store
//! 4. Build the router and serve until ctrl-c / SIGTERM

use std::net::SocketAddr;

use propgate::{api::router, auth::TokenIssuer, config::Config, state::AppState, storage::UserStore};
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if config.log_format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Fail fast on bad configuration - in particular a missing signing
    // secret, without which issued tokens could never be verified.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let db_path = config.data_dir.join("users.redb");
    let users = match UserStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(path = %db_path.display(), error = %e, "failed to open user store");
            std::process::exit(1);
        }
    };

    let tokens = TokenIssuer::new(config.token_secret.as_bytes(), config.token_ttl_secs);
    let state = AppState::new(users, tokens);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("Propgate server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}
