//! User persistence
//!
//! [`UserRepository`] is the store client the handlers depend on. Two
//! backends implement it:
//!
//! - [`PgUserRepository`]: PostgreSQL through a sqlx pool
//! - [`MemoryUserRepository`]: in-process rows, used by tests and for running
//!   without a database
//!
//! Both hide soft-deleted rows from every read.

mod error;
mod memory;
mod pagination;
mod postgres;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemoryUserRepository;
pub use pagination::{FilterCondition, FilterValue, OrderDirection, Pagination};
pub use postgres::PgUserRepository;
pub use traits::{HealthCheck, Repository, RepositoryResult, SoftDeleteRepository, UserRepository};
