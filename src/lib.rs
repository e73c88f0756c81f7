pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod templates;

use std::{num::NonZeroU32, sync::Arc};

use axum::{
    Router,
    middleware,
    routing::{any, get, post},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use crate::{catalog::MovieCatalog, config::Config};

pub struct AppState {
    pub config: Arc<Config>,
    pub db: DatabaseConnection,
    pub catalog: MovieCatalog,
    /// Login attempts per username.
    pub login_limiter: DefaultKeyedRateLimiter<String>,
}

impl AppState {
    pub fn new(config: Arc<Config>, db: DatabaseConnection) -> Self {
        let rps = NonZeroU32::new(config.login_rps).unwrap_or(NonZeroU32::MIN);
        Self {
            catalog: MovieCatalog::new(db.clone()),
            login_limiter: RateLimiter::keyed(Quota::per_second(rps)),
            config,
            db,
        }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    // Every method reaches the pipeline so the staff check runs before the
    // method check; `require_staff_get` rejects anything but GET.
    let api = Router::new()
        .route("/api/v1/movies/", any(routes::movies))
        .route("/api/v1/movies/{id}/", any(routes::movie))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_staff_get));

    Router::new()
        .merge(api)
        .route("/admin/login/", get(routes::login_form).post(routes::login))
        .route("/admin/logout/", post(routes::logout))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
