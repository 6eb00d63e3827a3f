// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    models::{
        LoginRequest, RegisterRequest, TokenResponse, WalletAddress, WalletLoginRequest,
        WalletLoginResponse,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/wallet-login", post(auth::wallet_login));

    // Every route below the middleware requires a valid session token.
    let protected_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/v1", public_routes.merge(protected_routes))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::wallet_login,
        users::get_current_user,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            WalletLoginRequest,
            WalletAddress,
            TokenResponse,
            WalletLoginResponse,
            users::UserMeResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Credential verification and token issuance"),
        (name = "Users", description = "Authenticated user information"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
