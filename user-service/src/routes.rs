//! Route table
//!
//! ```text
//! GET    /health
//! GET    /ready
//! GET    /api/v1/users
//! POST   /api/v1/users
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers;
use crate::health;
use crate::repository::UserRepository;
use crate::state::AppState;

/// Base path of the versioned API
pub const API_BASE_PATH: &str = "/api/v1";

fn user_routes<R: UserRepository>() -> Router<AppState<R>> {
    Router::new()
        .route(
            "/users",
            get(handlers::list_users::<R>).post(handlers::create_user::<R>),
        )
        .route(
            "/users/{id}",
            put(handlers::update_user::<R>).delete(handlers::delete_user::<R>),
        )
}

/// Build the application router without middleware
pub fn router<R: UserRepository>(state: AppState<R>) -> Router {
    Router::new()
        .route("/health", get(health::health::<R>))
        .route("/ready", get(health::readiness::<R>))
        .nest(API_BASE_PATH, user_routes::<R>())
        .with_state(state)
}
