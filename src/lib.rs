use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .route("/users/register", post(handlers::users::register))
        .route("/users/login", post(handlers::users::login));

    // Everything below requires a valid bearer token
    let protected = Router::new()
        .route("/users/me", get(handlers::users::me))
        .route(
            "/categories",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route(
            "/categories/:id",
            get(handlers::categories::get_one)
                .put(handlers::categories::update)
                .delete(handlers::categories::remove),
        )
        .route(
            "/items",
            get(handlers::items::list).post(handlers::items::create),
        )
        .route(
            "/items/:id",
            get(handlers::items::get_one)
                .put(handlers::items::update)
                .delete(handlers::items::remove),
        )
        .route("/bootstrap", get(handlers::bootstrap::get_all))
        .route_layer(from_fn(middleware::jwt_auth_middleware));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
