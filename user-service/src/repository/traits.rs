//! Repository trait definitions
//!
//! Traits use RPITIT (return position `impl Trait` in traits), so backends
//! implement them with plain `async fn`.
//!
//! - [`Repository`]: read, create and update operations
//! - [`SoftDeleteRepository`]: marking rows deleted without erasing them
//! - [`HealthCheck`]: cheap store probe used by the readiness endpoint
//! - [`UserRepository`]: everything the user handlers need, in one bound

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::{FilterCondition, OrderDirection, Pagination};
use crate::models::{CreateUser, UpdateUser, User, UserId};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Base repository trait for CRUD operations
///
/// Reads never return soft-deleted rows.
///
/// # Type Parameters
///
/// - `Id`: The identifier type for the entity
/// - `Entity`: The full entity type returned from queries
/// - `Create`: The payload for creating new entities
/// - `Update`: The patch applied to existing entities
pub trait Repository<Id, Entity, Create, Update>: Send + Sync {
    /// Find a live entity by its identifier
    fn find_by_id(&self, id: &Id) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;

    /// Find all live entities matching the given filters
    ///
    /// `order_by` names a column and a direction. The column is not checked
    /// against the schema here; an unknown column is reported by the store.
    fn find_all(
        &self,
        filters: &[FilterCondition],
        order_by: Option<(&str, OrderDirection)>,
        pagination: Option<Pagination>,
    ) -> impl Future<Output = RepositoryResult<Vec<Entity>>> + Send;

    /// Insert a new entity and return it with its generated fields
    fn create(&self, data: Create) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Apply a patch to a live entity and persist the merged record
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error if the entity does not exist or was
    /// soft-deleted before the write.
    fn update(&self, id: &Id, data: Update) -> impl Future<Output = RepositoryResult<Entity>> + Send;
}

/// Extended repository trait for soft delete support
pub trait SoftDeleteRepository<Id, Entity, Create, Update>:
    Repository<Id, Entity, Create, Update>
{
    /// Mark a live entity as deleted
    ///
    /// Returns `true` if a row was marked, `false` if no live row matched.
    fn soft_delete(&self, id: &Id) -> impl Future<Output = RepositoryResult<bool>> + Send;
}

/// Store connectivity probe
pub trait HealthCheck: Send + Sync {
    fn ping(&self) -> impl Future<Output = RepositoryResult<()>> + Send;
}

/// Store client consumed by the user handlers
///
/// Blanket-implemented for every backend providing the required traits.
pub trait UserRepository:
    SoftDeleteRepository<UserId, User, CreateUser, UpdateUser> + HealthCheck + Clone + 'static
{
}

impl<T> UserRepository for T where
    T: SoftDeleteRepository<UserId, User, CreateUser, UpdateUser> + HealthCheck + Clone + 'static
{
}
