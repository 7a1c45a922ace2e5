//! HTTP CRUD service for user records
//!
//! Users are stored in PostgreSQL and never erased: deleting one sets its
//! `deleted_at` marker, after which it disappears from every read.
//!
//! ```text
//! GET    /api/v1/users?age=&sort=&page=&limit=   list live users
//! POST   /api/v1/users                           create
//! PUT    /api/v1/users/{id}                      partial update
//! DELETE /api/v1/users/{id}                      soft delete
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use user_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     let pool = database::create_pool(&config.database).await?;
//!     run(config, PgUserRepository::new(pool)).await
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{Error, Result};

use axum::Router;

use crate::{config::Config, repository::UserRepository, server::Server, state::AppState};

/// Build the full application: routes, state and middleware
pub fn app<R: UserRepository>(config: Config, users: R) -> Router {
    let state = AppState::new(config.clone(), users);
    server::apply_middleware(routes::router(state), &config)
}

/// Serve the API over `users` until a shutdown signal arrives
pub async fn run<R: UserRepository>(config: Config, users: R) -> Result<()> {
    let state = AppState::new(config.clone(), users);
    Server::new(config).serve(routes::router(state)).await
}

pub mod prelude {
    pub use crate::config::{Config, StoreBackend};
    pub use crate::database;
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{ApiError, ApiErrorKind, ListUsersQuery};
    pub use crate::models::{CreateUser, Model, UpdateUser, User, UserId};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        MemoryUserRepository, PgUserRepository, Repository, SoftDeleteRepository, UserRepository,
    };
    pub use crate::state::AppState;
    pub use crate::{app, run};
}
