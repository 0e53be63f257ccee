//! Application wiring: core services and the router.

use std::sync::Arc;

use axum::{Extension, Router, middleware};

use comercio_auth::{
    AccountStore, AuthConfig, AuthResult, Authenticator, AuthorizationGate, PermissionResolver,
    PermissionStore, SystemClock, TokenCodec, TokenRefresher,
};

use crate::middleware::{AuthState, auth_middleware};

pub mod errors;
pub mod routes;

/// Auth core services shared by all handlers.
pub struct AppServices {
    pub codec: Arc<TokenCodec>,
    pub authenticator: Authenticator,
    pub refresher: TokenRefresher,
    pub gate: AuthorizationGate,
}

impl AppServices {
    pub fn new(
        config: AuthConfig,
        accounts: Arc<dyn AccountStore>,
        permissions: Arc<dyn PermissionStore>,
    ) -> AuthResult<Self> {
        let codec = Arc::new(TokenCodec::new(config, Arc::new(SystemClock))?);

        Ok(Self {
            codec: codec.clone(),
            authenticator: Authenticator::new(accounts.clone(), codec.clone()),
            refresher: TokenRefresher::new(accounts, codec),
            gate: AuthorizationGate::new(PermissionResolver::new(permissions)),
        })
    }
}

/// Build the application router over the given stores.
pub fn build_app(
    config: AuthConfig,
    accounts: Arc<dyn AccountStore>,
    permissions: Arc<dyn PermissionStore>,
) -> AuthResult<Router> {
    let services = Arc::new(AppServices::new(config, accounts, permissions)?);

    let auth_state = AuthState {
        codec: services.codec.clone(),
    };

    let public = Router::new()
        .route("/auth/login", axum::routing::post(routes::auth::login))
        .route("/auth/refresh", axum::routing::post(routes::auth::refresh));

    let protected = Router::new()
        .route("/auth/me", axum::routing::get(routes::auth::me))
        .route("/auth/rotate", axum::routing::post(routes::auth::rotate))
        .route("/auth/check", axum::routing::get(routes::auth::check))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    Ok(public.merge(protected).layer(Extension(services)))
}
