//! HTTP handlers for the user collection
//!
//! - [`users`]: list, create, update and soft delete
//! - [`ListUsersQuery`]: lenient parsing of the list query string
//! - [`ApiError`]: handler errors with HTTP status mapping

mod error;
mod query;
pub mod users;

pub use error::{ApiError, ApiErrorKind, ApiErrorResponse, ApiOperation};
pub use query::{ListUsersQuery, DEFAULT_LIMIT, DEFAULT_SORT};
pub use users::{create_user, delete_user, list_users, update_user};
